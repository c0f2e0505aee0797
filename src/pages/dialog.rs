/// Visual weight of the confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmVariant {
    #[default]
    Primary,
    Danger,
    Success,
}

/// Generic yes/no prompt. The caller supplies the action to run on confirm,
/// runs it, and closes the dialog itself afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog<A> {
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub on_confirm: A,
    pub confirm_variant: ConfirmVariant,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl<A: Clone> ConfirmDialog<A> {
    pub fn new(title: impl Into<String>, message: impl Into<String>, on_confirm: A) -> Self {
        Self {
            is_open: true,
            title: title.into(),
            message: message.into(),
            on_confirm,
            confirm_variant: ConfirmVariant::Primary,
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }

    pub fn variant(mut self, variant: ConfirmVariant) -> Self {
        self.confirm_variant = variant;
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    /// Hands back the action to run. Does not close the dialog.
    pub fn confirm(&self) -> Option<A> {
        self.is_open.then(|| self.on_confirm.clone())
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_returns_action_and_stays_open() {
        let dialog = ConfirmDialog::new("Delete", "Delete this post?", 42)
            .variant(ConfirmVariant::Danger)
            .confirm_text("Delete");
        assert_eq!(dialog.confirm(), Some(42));
        assert!(dialog.is_open);
        assert_eq!(dialog.confirm_variant, ConfirmVariant::Danger);
        assert_eq!(dialog.confirm_text, "Delete");
        assert_eq!(dialog.cancel_text, "Cancel");
    }

    #[test]
    fn closed_dialog_confirms_nothing() {
        let mut dialog = ConfirmDialog::new("t", "m", "action");
        dialog.close();
        assert_eq!(dialog.confirm(), None);
    }
}
