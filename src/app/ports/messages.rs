/// Produces user-facing text for a message key, substituting positional
/// `{0}`, `{1}`, … placeholders.
pub trait MessageFormatter {
    fn format(&self, key: &str, default_text: &str, args: &[&str]) -> String;
}

/// Uses the built-in default text for every key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageFormatter for DefaultMessages {
    fn format(&self, _key: &str, default_text: &str, args: &[&str]) -> String {
        substitute(default_text, args)
    }
}

pub fn substitute(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| {
            text.replace(&format!("{{{}}}", i), arg)
        })
}
