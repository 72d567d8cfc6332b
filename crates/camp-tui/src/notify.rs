#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub variant: ToastVariant,
    pub title: String,
    pub description: Option<String>,
}

impl Toast {
    /// Single-line rendering for the status bar.
    pub fn text(&self) -> String {
        match &self.description {
            Some(desc) => format!("{}: {desc}", self.title),
            None => self.title.clone(),
        }
    }
}

/// The latest toast plus at most one alert waiting to be dismissed.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    toast: Option<Toast>,
    alert: Option<String>,
}

impl Notifications {
    pub fn toast(&mut self, title: &str, description: Option<&str>) {
        self.toast = Some(Toast {
            variant: ToastVariant::Default,
            title: title.to_string(),
            description: description.map(String::from),
        });
    }

    pub fn error_toast(&mut self, description: &str) {
        self.toast = Some(Toast {
            variant: ToastVariant::Destructive,
            title: "Error".into(),
            description: Some(description.to_string()),
        });
    }

    pub fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_toast_replaces_older() {
        let mut n = Notifications::default();
        n.toast("Project Updated", None);
        n.error_toast("Failed to delete project");
        let toast = n.current_toast().unwrap();
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert_eq!(toast.text(), "Error: Failed to delete project");
    }

    #[test]
    fn alert_stays_until_dismissed() {
        let mut n = Notifications::default();
        n.alert("Failed to create task");
        n.clear_toast();
        assert_eq!(n.current_alert(), Some("Failed to create task"));
        n.dismiss_alert();
        assert!(n.current_alert().is_none());
    }
}
