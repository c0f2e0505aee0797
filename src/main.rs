use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use jobboard_admin::api::ApiClient;
use jobboard_admin::auth::AuthContext;
use jobboard_admin::config::Config;
use jobboard_admin::models::blog::BlogSearch;
use jobboard_admin::models::recruiter::AdvancedSearch;
use jobboard_admin::models::{
    AccountStatus, BlogFilters, BlogPost, CompanySize, PostStatus, RecruiterFilters,
    RecruiterProfile, Sector, ValidationAction,
};
use jobboard_admin::pages::{
    BlogFormPage, BlogListAction, BlogListPage, FormState, LoadState, RecruiterAction,
    RecruiterDetailPage, RecruitersPage,
};
use jobboard_admin::services::{RefreshScheduler, Services, StatsEndpoint};
use jobboard_admin::store::SqliteStore;
use jobboard_admin::tui::truncate;
use jobboard_admin::validation::validate_image;

#[derive(Parser)]
#[command(name = "jbadmin")]
#[command(about = "Job board administration - blog publishing and recruiter moderation")]
struct Cli {
    /// API base URL (overrides config and JBADMIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as an administrator
    Login {
        #[arg(short, long)]
        email: String,

        /// Read the password from this file instead of prompting
        #[arg(short, long)]
        password_file: Option<PathBuf>,
    },

    /// Log out and clear stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Confirm an email address with the token from the verification mail
    VerifyEmail { token: String },

    /// Send a password reset email
    ResetPassword { email: String },

    /// Own profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage blog posts
    Blog {
        #[command(subcommand)]
        command: BlogCommands,
    },

    /// Moderate recruiter accounts
    Recruiters {
        #[command(subcommand)]
        command: RecruiterCommands,
    },

    /// Inspect and revoke sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Read-only platform statistics
    Stats {
        /// Endpoint name, or "overview" for the dashboard set
        endpoint: String,
    },

    /// Interactive dashboard
    Tui,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show own profile
    Show,

    /// Upload a new avatar (JPEG, PNG or GIF, at most 5 MB)
    Avatar { file: PathBuf },
}

#[derive(Subcommand)]
enum BlogCommands {
    /// List posts
    List {
        #[arg(short, long)]
        search: Option<String>,

        /// DRAFT, PENDING, PUBLISHED or ARCHIVED
        #[arg(long, value_parser = parse_post_status)]
        status: Option<PostStatus>,

        /// Category id
        #[arg(short, long)]
        category: Option<i64>,

        #[arg(short, long)]
        featured: Option<bool>,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show one post
    Show { slug: String },

    /// Create a post
    Create(PostArgs),

    /// Edit a post; omitted fields keep their current value
    Edit {
        slug: String,

        #[command(flatten)]
        fields: PostArgs,
    },

    /// Delete a post
    Delete {
        slug: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Feature or unfeature a post
    Feature {
        slug: String,

        /// Remove the featured flag instead
        #[arg(long)]
        off: bool,

        #[arg(short, long)]
        yes: bool,
    },

    /// List categories
    Categories,

    /// Blog statistics
    Stats,

    /// Full-text search
    Search {
        query: String,

        #[arg(long, value_parser = parse_post_status)]
        status: Option<PostStatus>,

        #[arg(short, long)]
        category: Option<i64>,
    },
}

#[derive(Args, Default)]
struct PostArgs {
    #[arg(short, long)]
    title: Option<String>,

    #[arg(long)]
    content: Option<String>,

    /// Read the content from a file
    #[arg(long, conflicts_with = "content")]
    content_file: Option<PathBuf>,

    #[arg(long)]
    excerpt: Option<String>,

    /// Category id
    #[arg(short, long)]
    category: Option<i64>,

    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,

    #[arg(long, value_parser = parse_post_status)]
    status: Option<PostStatus>,

    #[arg(long)]
    featured: Option<bool>,

    #[arg(long)]
    meta_description: Option<String>,

    /// YYYY-MM-DD [HH:MM]; only used for published posts
    #[arg(long)]
    publish_date: Option<String>,

    /// Featured image (JPEG, PNG or GIF, at most 5 MB)
    #[arg(short, long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
enum RecruiterCommands {
    /// List recruiters
    List {
        /// PENDING, APPROVED or REJECTED
        #[arg(long, value_parser = parse_account_status)]
        status: Option<AccountStatus>,

        /// Country id
        #[arg(long)]
        country: Option<i64>,

        #[arg(long, value_parser = parse_sector)]
        sector: Option<Sector>,

        /// SMALL, MEDIUM or LARGE
        #[arg(long, value_parser = parse_company_size)]
        size: Option<CompanySize>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Recruiters awaiting validation
    Pending,

    /// Show one recruiter
    Show { id: i64 },

    /// Approve a pending recruiter
    Approve {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Reject a pending recruiter
    Reject {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Search public profiles
    Search {
        query: String,

        #[arg(long, value_parser = parse_account_status)]
        status: Option<AccountStatus>,

        #[arg(long, value_parser = parse_sector)]
        sector: Option<Sector>,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List sessions
    List,

    /// End every session of the current user
    LogoutAll {
        #[arg(short, long)]
        yes: bool,
    },

    /// End every session of another user
    ForceLogout {
        /// User id
        user: i64,

        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_post_status(value: &str) -> Result<PostStatus, String> {
    PostStatus::parse(value).ok_or_else(|| format!("unknown post status '{}'", value))
}

fn parse_account_status(value: &str) -> Result<AccountStatus, String> {
    AccountStatus::parse(value).ok_or_else(|| format!("unknown account status '{}'", value))
}

fn parse_sector(value: &str) -> Result<Sector, String> {
    Sector::parse(value).ok_or_else(|| format!("unknown sector '{}'", value))
}

fn parse_company_size(value: &str) -> Result<CompanySize, String> {
    CompanySize::parse(value).ok_or_else(|| format!("unknown company size '{}'", value))
}

/// Logs go to stderr, or to a file while the dashboard owns the terminal.
fn init_tracing(to_file: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "jobboard_admin=info,jbadmin=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = SqliteStore::default_path().with_file_name("jbadmin.log");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.set_base_url(url);
    }
    Ok(config)
}

fn build_services(config: &Config) -> Result<Services> {
    let store = match &config.storage.path {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_default()?,
    };
    let auth = Arc::new(AuthContext::init(Arc::new(store))?);
    let client = ApiClient::new(&config.api, auth)?;
    let mut services = Services::new(client);
    services.tokens = services
        .tokens
        .with_threshold(config.auth.refresh_threshold_secs);
    Ok(services)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Tui))?;

    let config = load_config(&cli)?;
    info!(base_url = %config.api.base_url, "configuration loaded");
    let services = build_services(&config)?;

    match cli.command {
        Commands::Login {
            email,
            password_file,
        } => {
            let password = match password_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read password file: {}", path.display()))?
                    .trim()
                    .to_string(),
                None => prompt("Password: ")?,
            };
            let user = services.auth.login(&email, &password).await?;
            match user {
                Some(user) => println!("Logged in as {} <{}>", user.display_name(), user.email),
                None => println!("Logged in as {}", email),
            }
        }

        Commands::Logout => {
            services.auth.logout().await?;
            println!("Logged out.");
        }

        Commands::Whoami => match services.auth.current_user() {
            Some(user) => {
                println!("{} <{}>", user.display_name(), user.email);
                if let Some(kind) = &user.user_type {
                    println!("Type: {}", kind);
                }
                if services.auth.is_token_expired() {
                    println!("(access token expired; it will be refreshed on the next command)");
                }
            }
            None if services.auth.is_authenticated() => println!("Logged in."),
            None => println!("Not logged in."),
        },

        Commands::VerifyEmail { token } => {
            let detail = services.auth.verify_email(&token).await?;
            println!("{}", detail.as_deref().unwrap_or("Email verified."));
        }

        Commands::ResetPassword { email } => {
            let detail = services.auth.request_password_reset(&email).await?;
            println!("{}", detail.as_deref().unwrap_or("Password reset email sent."));
        }

        Commands::Profile { command } => {
            ensure_session(&services).await?;
            run_profile(&services, command).await?;
        }

        Commands::Blog { command } => {
            ensure_session(&services).await?;
            run_blog(&services, command).await?;
        }

        Commands::Recruiters { command } => {
            ensure_session(&services).await?;
            run_recruiters(&services, command).await?;
        }

        Commands::Sessions { command } => {
            ensure_session(&services).await?;
            run_sessions(&services, command).await?;
        }

        Commands::Stats { endpoint } => {
            ensure_session(&services).await?;
            run_stats(&services, &endpoint).await?;
        }

        Commands::Tui => {
            ensure_session(&services).await?;
            let refresher = RefreshScheduler::start(services.tokens.clone());
            let result = jobboard_admin::tui::run_dashboard(services).await;
            refresher.stop().await;
            result?;
        }
    }

    Ok(())
}

/// Fails early when nobody is logged in; refreshes a token close to expiry.
async fn ensure_session(services: &Services) -> Result<()> {
    if !services.auth.client().auth().is_authenticated() {
        bail!("Not logged in. Run `jbadmin login --email <email>` first.");
    }
    if let Err(e) = services.tokens.refresh_if_needed().await {
        warn!(error = %e, "token refresh before command failed");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn read_image(path: &Path) -> Result<jobboard_admin::validation::ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    Ok(validate_image(file_name, bytes)?)
}

async fn run_profile(services: &Services, command: ProfileCommands) -> Result<()> {
    let profile = match command {
        ProfileCommands::Show => services.profile.get_profile().await?,
        ProfileCommands::Avatar { file } => {
            let upload = read_image(&file)?;
            let profile = services.profile.update_avatar(&upload).await?;
            println!("Avatar updated.");
            profile
        }
    };
    println!("User #{}", profile.user.id);
    println!("Name: {}", profile.user.display_name());
    println!("Email: {}{}", profile.user.email, if profile.email_verified { "" } else { " (unverified)" });
    if let Some(phone) = &profile.phone {
        println!("Phone: {}", phone);
    }
    if let Some(avatar) = &profile.avatar {
        println!("Avatar: {}", avatar);
    }
    if let Some(joined) = &profile.date_joined {
        println!("Joined: {}", joined);
    }
    Ok(())
}

fn print_posts(posts: &[BlogPost]) {
    println!(
        "{:<30} {:<12} {:<3} {:<36} {:>6}",
        "SLUG", "STATUT", "*", "TITLE", "VIEWS"
    );
    println!("{}", "-".repeat(91));
    for post in posts {
        println!(
            "{:<30} {:<12} {:<3} {:<36} {:>6}",
            truncate(&post.slug, 28),
            post.status.label(),
            if post.is_featured { "*" } else { "" },
            truncate(&post.title, 34),
            post.views_count
        );
    }
}

async fn run_blog(services: &Services, command: BlogCommands) -> Result<()> {
    let blog = &services.blog;
    match command {
        BlogCommands::List {
            search,
            status,
            category,
            featured,
            page,
        } => {
            let mut list = BlogListPage::new(BlogFilters::default());
            list.set_search(search);
            list.set_status(status);
            list.set_category(category);
            list.set_featured(featured);
            list.filters.page = page.max(1);
            list.load(blog).await;
            match &list.posts {
                LoadState::Loaded(result) if result.results.is_empty() => {
                    println!("No posts found.")
                }
                LoadState::Loaded(result) => {
                    print_posts(&result.results);
                    println!(
                        "\nPage {} - {} post(s){}",
                        list.filters.page,
                        result.count,
                        if result.has_next() { " (more: --page)" } else { "" }
                    );
                }
                LoadState::Failed(message) => bail!("{}", message),
                LoadState::Idle | LoadState::Loading => {}
            }
        }

        BlogCommands::Show { slug } => {
            let post = blog.get_post(&slug).await?;
            println!("{}", post.title);
            println!("Slug: {}", post.slug);
            println!("Statut: {}", post.status.label());
            if post.is_featured {
                println!("Featured: yes");
            }
            if let Some(category) = &post.category {
                println!("Category: {}", category.display());
            }
            if let Some(author) = &post.author {
                println!("Author: {}", author.display());
            }
            if !post.tags.is_empty() {
                println!("Tags: {}", post.tags.join(", "));
            }
            if let Some(date) = post.publish_date {
                println!("Published: {}", date.format("%Y-%m-%d %H:%M"));
            }
            println!("Views: {}", post.views_count);
            if let Some(image) = &post.featured_image {
                println!("Image: {}", image);
            }
            if let Some(excerpt) = &post.excerpt {
                println!("\n{}", textwrap::fill(excerpt, 80));
            }
            println!("\n--- Content ---\n{}", post.content);
        }

        BlogCommands::Create(fields) => {
            let mut form = BlogFormPage::create();
            form.load(blog).await;
            apply_post_args(&mut form, fields)?;
            save_post(&mut form, blog).await?;
        }

        BlogCommands::Edit { slug, fields } => {
            let mut form = BlogFormPage::edit(&slug);
            form.load(blog).await;
            if let FormState::Failed(message) = &form.state {
                bail!("{}", message);
            }
            apply_post_args(&mut form, fields)?;
            save_post(&mut form, blog).await?;
        }

        BlogCommands::Delete { slug, yes } => {
            let post = blog.get_post(&slug).await?;
            if !confirm(&format!("Delete \"{}\"? This cannot be undone.", post.title), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let action = BlogListAction::Delete {
                slug: post.slug,
                title: post.title,
            };
            println!("{}", action.execute(blog).await?);
        }

        BlogCommands::Feature { slug, off, yes } => {
            let post = blog.get_post(&slug).await?;
            let question = if off {
                format!("Remove \"{}\" from featured posts?", post.title)
            } else {
                format!("Feature \"{}\"?", post.title)
            };
            if !confirm(&question, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let action = BlogListAction::SetFeatured {
                slug: post.slug,
                featured: !off,
            };
            println!("{}", action.execute(blog).await?);
        }

        BlogCommands::Categories => {
            let categories = blog.list_categories().await?;
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                println!("{:<6} {:<30} {:<30}", "ID", "NAME", "SLUG");
                println!("{}", "-".repeat(66));
                for category in categories {
                    println!(
                        "{:<6} {:<30} {:<30}",
                        category.id,
                        truncate(&category.name, 28),
                        truncate(category.slug.as_deref().unwrap_or("-"), 28)
                    );
                }
            }
        }

        BlogCommands::Stats => {
            let stats = blog.get_stats().await?;
            println!("Total posts:  {}", stats.total_posts);
            println!("  {:<12} {}", PostStatus::Published.label(), stats.published_posts);
            println!("  {:<12} {}", PostStatus::Draft.label(), stats.draft_posts);
            println!("  {:<12} {}", PostStatus::Pending.label(), stats.pending_posts);
            println!("  {:<12} {}", PostStatus::Archived.label(), stats.archived_posts);
            println!("Featured:     {}", stats.featured_posts);
            println!("Total views:  {}", stats.total_views);
            for (key, value) in &stats.extra {
                println!("{}: {}", key, value);
            }
        }

        BlogCommands::Search {
            query,
            status,
            category,
        } => {
            let found = blog
                .search(&BlogSearch {
                    query,
                    status,
                    category,
                    tags: Vec::new(),
                })
                .await?;
            if found.results.is_empty() {
                println!("No posts found.");
            } else {
                print_posts(&found.results);
            }
        }
    }
    Ok(())
}

fn apply_post_args(form: &mut BlogFormPage, fields: PostArgs) -> Result<()> {
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(path) = fields.content_file {
        form.content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?;
    } else if let Some(content) = fields.content {
        form.content = content;
    }
    if let Some(excerpt) = fields.excerpt {
        form.excerpt = excerpt;
    }
    if let Some(category) = fields.category {
        form.category = Some(category);
    }
    if let Some(tags) = fields.tags {
        form.tags_input = tags;
    }
    if let Some(status) = fields.status {
        form.status = status;
    }
    if let Some(featured) = fields.featured {
        form.is_featured = featured;
    }
    if let Some(meta) = fields.meta_description {
        form.meta_description = meta;
    }
    if let Some(date) = fields.publish_date {
        form.publish_date_input = date;
    }
    if let Some(path) = fields.image {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read image: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        form.select_image(&file_name, bytes);
    }
    Ok(())
}

async fn save_post(form: &mut BlogFormPage, blog: &jobboard_admin::services::BlogService) -> Result<()> {
    if form.submit(blog).await {
        if let FormState::Saved(post) = &form.state {
            println!("Saved \"{}\" ({}) - {}", post.title, post.slug, post.status.label());
        }
        return Ok(());
    }
    if !form.field_errors.is_empty() {
        let errors: Vec<String> = form
            .field_errors
            .iter()
            .map(|(field, message)| format!("  {}: {}", field, message))
            .collect();
        bail!("Invalid post:\n{}", errors.join("\n"));
    }
    match &form.state {
        FormState::Failed(message) => Err(anyhow!("{}", message)),
        _ => Err(anyhow!("Post was not saved")),
    }
}

fn print_recruiters(recruiters: &[RecruiterProfile]) {
    println!(
        "{:<6} {:<12} {:<28} {:<24} {:<14}",
        "ID", "STATUT", "COMPANY", "CONTACT", "SECTOR"
    );
    println!("{}", "-".repeat(88));
    for r in recruiters {
        println!(
            "{:<6} {:<12} {:<28} {:<24} {:<14}",
            r.id,
            r.account_status.label(),
            truncate(&r.company_name, 26),
            truncate(&r.contact_name(), 22),
            truncate(r.sector.label(), 12)
        );
    }
}

fn print_recruiter(r: &RecruiterProfile) {
    println!("Recruiter #{}", r.id);
    println!("Company: {}", r.company_name);
    println!("Statut: {}", r.account_status.label());
    println!("Sector: {}", r.sector.label());
    println!("Size: {}", r.company_size.label());
    println!("Contact: {} <{}>", r.contact_name(), r.user.email);
    if let Some(email) = &r.contact_email {
        println!("Company email: {}", email);
    }
    if let Some(phone) = r.contact_phone.as_ref().or(r.user.phone.as_ref()) {
        println!("Phone: {}", phone);
    }
    if let Some(website) = &r.website {
        println!("Website: {}", website);
    }
    if let Some(country) = &r.country {
        println!("Country: {}", country.display());
    }
    if let Some(region) = &r.region {
        println!("Region: {}", region.display());
    }
    if let Some(description) = &r.description {
        println!("\n{}", textwrap::fill(description, 80));
    }
    if !r.documents.is_empty() {
        println!("\nDocuments:");
        for doc in &r.documents {
            println!(
                "  {} ({})",
                doc.name.as_deref().unwrap_or("document"),
                doc.url.as_deref().unwrap_or("-")
            );
        }
    }
}

async fn run_recruiters(services: &Services, command: RecruiterCommands) -> Result<()> {
    let recruiters = &services.recruiters;
    match command {
        RecruiterCommands::List {
            status,
            country,
            sector,
            size,
            search,
            page,
        } => {
            let mut list = RecruitersPage::new(RecruiterFilters::default());
            list.set_status(status);
            list.set_country(country);
            list.set_sector(sector);
            list.set_company_size(size);
            list.set_search(search);
            list.filters.page = page.max(1);
            list.load(recruiters).await;

            match &list.listing {
                LoadState::Loaded(result) if result.items.is_empty() => {
                    println!("No recruiters found.")
                }
                LoadState::Loaded(result) => {
                    print_recruiters(&result.items);
                    println!("\n{} recruiter(s)", result.total);
                }
                LoadState::Failed(message) => bail!("{}", message),
                LoadState::Idle | LoadState::Loading => {}
            }
            match &list.pending {
                LoadState::Loaded(pending) if !pending.is_empty() => {
                    println!("{} awaiting validation (jbadmin recruiters pending)", pending.len());
                }
                LoadState::Failed(message) => warn!(%message, "could not load pending recruiters"),
                _ => {}
            }
        }

        RecruiterCommands::Pending => {
            let pending = recruiters.list_pending().await?;
            if pending.is_empty() {
                println!("No recruiters awaiting validation.");
            } else {
                print_recruiters(&pending);
            }
        }

        RecruiterCommands::Show { id } => {
            let mut detail = RecruiterDetailPage::new(id);
            detail.load(recruiters).await;
            match &detail.profile {
                LoadState::Loaded(profile) => print_recruiter(profile),
                LoadState::Failed(message) => bail!("{}", message),
                LoadState::Idle | LoadState::Loading => {}
            }
        }

        RecruiterCommands::Approve { id, yes } => {
            validate(services, id, ValidationAction::Approve, yes).await?;
        }

        RecruiterCommands::Reject { id, yes } => {
            validate(services, id, ValidationAction::Reject, yes).await?;
        }

        RecruiterCommands::Search {
            query,
            status,
            sector,
        } => {
            let found = recruiters
                .advanced_search(&AdvancedSearch {
                    query,
                    user_type: Some("recruiter".to_string()),
                    account_status: status,
                    sector,
                    country: None,
                })
                .await?;
            if found.items.is_empty() {
                println!("No recruiters found.");
            } else {
                print_recruiters(&found.items);
            }
        }
    }
    Ok(())
}

async fn validate(services: &Services, id: i64, action: ValidationAction, yes: bool) -> Result<()> {
    let mut detail = RecruiterDetailPage::new(id);
    detail.load(&services.recruiters).await;
    let profile = match &detail.profile {
        LoadState::Loaded(profile) => profile.clone(),
        LoadState::Failed(message) => bail!("{}", message),
        LoadState::Idle | LoadState::Loading => bail!("Recruiter #{} could not be loaded", id),
    };
    if !profile.is_pending() {
        println!(
            "Note: {} is currently {}.",
            profile.company_name,
            profile.account_status.label()
        );
    }

    let dialog = RecruiterAction::for_profile(&profile, action).dialog();
    if !confirm(&dialog.message, yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    if let Some(action) = dialog.confirm() {
        println!("{}", action.execute(&services.recruiters).await?);
    }
    Ok(())
}

async fn run_sessions(services: &Services, command: SessionCommands) -> Result<()> {
    let sessions = &services.sessions;
    match command {
        SessionCommands::List => {
            let list = sessions.list_sessions().await?;
            if list.is_empty() {
                println!("No sessions found.");
                return Ok(());
            }
            let current = services.auth.client().auth().session_id();
            let now = chrono::Utc::now();
            println!(
                "{:<38} {:<16} {:<16} {:<8} {:<30}",
                "ID", "USER", "IP", "ACTIVE", "LAST ACTIVITY"
            );
            println!("{}", "-".repeat(108));
            for session in list {
                let marker = if current.as_deref() == Some(session.id.as_str()) {
                    " (this)"
                } else {
                    ""
                };
                println!(
                    "{:<38} {:<16} {:<16} {:<8} {:<30}",
                    truncate(&format!("{}{}", session.id, marker), 36),
                    truncate(&session.user.as_ref().map(|u| u.display()).unwrap_or_default(), 14),
                    session.ip_address.as_deref().unwrap_or("-"),
                    if session.is_valid_at(now) { "yes" } else { "no" },
                    session
                        .last_activity
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }

        SessionCommands::LogoutAll { yes } => {
            if !confirm("End every session, including this one?", yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            sessions.logout_all().await?;
            services.auth.client().auth().clear()?;
            println!("All sessions ended. Log in again to continue.");
        }

        SessionCommands::ForceLogout { user, yes } => {
            if !confirm(&format!("End every session of user #{}?", user), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            sessions.force_logout(user).await?;
            println!("Sessions of user #{} ended.", user);
        }
    }
    Ok(())
}

async fn run_stats(services: &Services, endpoint: &str) -> Result<()> {
    if endpoint == "overview" {
        for (endpoint, result) in services.stats.overview().await {
            println!("== {} ==", endpoint.name());
            match result {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => println!("error: {}", e),
            }
            println!();
        }
        return Ok(());
    }
    let endpoint: StatsEndpoint = endpoint.parse().map_err(|e: String| anyhow!(e))?;
    let value = services.stats.fetch(endpoint).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
