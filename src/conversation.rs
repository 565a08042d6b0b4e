use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    Transcription,
    Error,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "NubemCopilot",
            Sender::Transcription => "Transcription",
            Sender::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub body: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(sender: Sender, body: impl Into<String>) -> Self {
        Self::at(sender, body, Local::now())
    }

    pub fn at(sender: Sender, body: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            sender,
            body: body.into(),
            timestamp,
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Append-only log of the chat, oldest first.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    scroll_pending: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps never go backwards: a message stamped earlier than the
    /// current tail takes the tail's timestamp.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
        self.scroll_pending = true;
    }

    pub fn push(&mut self, sender: Sender, body: impl Into<String>) {
        self.append(Message::new(sender, body));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns true once after each append so the view can jump to the tail.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.messages {
            out.push_str(&format!(
                "[{}] {}: {}\n\n",
                m.time_label(),
                m.sender.label(),
                m.body
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    #[test]
    fn render_lists_messages_in_order() {
        let mut log = Conversation::new();
        log.append(Message::at(Sender::User, "hello", at(9, 5)));
        log.append(Message::at(Sender::Assistant, "hi there", at(9, 6)));
        assert_eq!(
            log.render(),
            "[09:05] You: hello\n\n[09:06] NubemCopilot: hi there\n\n"
        );
    }

    #[test]
    fn empty_log_renders_nothing() {
        assert_eq!(Conversation::new().render(), "");
    }

    #[test]
    fn timestamps_are_clamped_to_tail() {
        let mut log = Conversation::new();
        log.append(Message::at(Sender::User, "a", at(10, 30)));
        log.append(Message::at(Sender::Error, "b", at(10, 10)));
        assert_eq!(log.messages()[1].timestamp, at(10, 30));
        assert_eq!(log.last().unwrap().body, "b");
    }

    #[test]
    fn scroll_request_is_consumed_once() {
        let mut log = Conversation::new();
        assert!(!log.take_scroll_request());
        log.push(Sender::User, "x");
        assert!(log.take_scroll_request());
        assert!(!log.take_scroll_request());
        assert_eq!(log.len(), 1);
    }
}
