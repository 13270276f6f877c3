//! Operator-facing phrases.
//!
//! Callers look phrases up by [`Message`] through a [`Translator`]; the client
//! supplies its own localized implementation, [`English`] is the fallback.

/// Identifiers of the phrases emitted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Args: direct IP, proxied IP.
    Proxied,
    /// Args: direct IP.
    Unproxied,
    FixProxySettings,
}

/// Phrase lookup. `{0}`, `{1}`, ... in a template are replaced by `args`.
pub trait Translator: Send + Sync {
    fn template(&self, message: Message) -> &str;

    fn translate(&self, message: Message, args: &[&str]) -> String {
        let mut text = self.template(message).to_string();
        for (i, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{}}}", i), arg);
        }
        text
    }
}

/// Built-in English phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Translator for English {
    fn template(&self, message: Message) -> &str {
        match message {
            Message::Proxied => "Your IP is: {0} | Proxy IP is: {1}",
            Message::Unproxied => "Your IP is: {0}",
            Message::FixProxySettings => {
                "Press any key to exit so you can fix your proxy settings..."
            }
        }
    }
}
