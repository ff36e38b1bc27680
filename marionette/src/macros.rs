/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use marionette::{Role, mn_msg};
///
/// let message = mn_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! mn_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use marionette::{Role, mn_messages};
///
/// let messages = mn_messages![
///     system => "You are a cheerful avatar.",
///     user => "Say hello to chat.",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! mn_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::mn_msg!($role => $content)),+]
    };
}
