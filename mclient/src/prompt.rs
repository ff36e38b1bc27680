//! Prompt template pairs rendered per call.

use std::path::PathBuf;

use crate::error::ClientError;

const EMOTION_SYSTEM_PROMPT: &str = "\
You are the emotion classifier for a live avatar. Read the user's text and \
answer with exactly one JSON object of the form \
{\"emotion\": \"<label>\", \"intensity\": <number>}. The emotion must be one \
of: neutral, happy, sad, angry, surprised, thinking, confused, excited, \
sleepy. The intensity must be a number between 0.0 and 1.0. Answer with the \
JSON object only, no other text.";

const EMOTION_USER_PROMPT: &str = "Classify the emotional tone of this text: {text}";

/// Loads `<name>_system.md` / `<name>_user.md` template pairs.
///
/// With a directory configured, files are re-read on every render; they
/// are tiny and editing them live is part of the workflow. Without one,
/// only the compiled-in emotion pair is available, so classification
/// works out of the box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLibrary {
    dir: Option<PathBuf>,
}

impl PromptLibrary {
    pub fn builtin() -> Self {
        Self { dir: None }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Renders the system and user halves of a template pair. `{key}`
    /// placeholders in the user half are substituted from `vars`.
    pub fn render_pair(
        &self,
        name: &str,
        vars: &[(&str, &str)],
    ) -> Result<(String, String), ClientError> {
        let system = self.load(&format!("{name}_system"))?;
        let user = substitute(&self.load(&format!("{name}_user"))?, vars);
        Ok((system, user))
    }

    fn load(&self, name: &str) -> Result<String, ClientError> {
        match &self.dir {
            Some(dir) => {
                let path = dir.join(format!("{name}.md"));
                std::fs::read_to_string(&path)
                    .map(|content| content.trim().to_string())
                    .map_err(|err| {
                        ClientError::invalid_value(format!(
                            "prompt file {} is not readable: {err}",
                            path.display()
                        ))
                    })
            }
            None => builtin_prompt(name).map(str::to_string).ok_or_else(|| {
                ClientError::invalid_value(format!(
                    "no built-in prompt named '{name}' and no prompts directory is configured"
                ))
            }),
        }
    }
}

fn builtin_prompt(name: &str) -> Option<&'static str> {
    match name {
        "emotion_system" => Some(EMOTION_SYSTEM_PROMPT),
        "emotion_user" => Some(EMOTION_USER_PROMPT),
        _ => None,
    }
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::PromptLibrary;
    use crate::error::ClientErrorKind;

    fn temp_dir(prefix: &str) -> std::path::PathBuf {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mclient-{prefix}-{unique}"));
        std::fs::create_dir_all(&dir).expect("temp dir creates");
        dir
    }

    #[test]
    fn builtin_emotion_pair_renders_with_substitution() {
        let (system, user) = PromptLibrary::builtin()
            .render_pair("emotion", &[("text", "good morning!")])
            .expect("builtin pair exists");

        assert!(system.contains("neutral, happy, sad"));
        assert!(system.contains("intensity"));
        assert_eq!(user, "Classify the emotional tone of this text: good morning!");
    }

    #[test]
    fn builtin_library_rejects_unknown_templates() {
        let err = PromptLibrary::builtin()
            .render_pair("banter", &[])
            .expect_err("no such builtin");

        assert_eq!(err.kind, ClientErrorKind::InvalidValue);
        assert!(err.message.contains("banter_system"));
    }

    #[test]
    fn directory_templates_are_loaded_and_trimmed() {
        let dir = temp_dir("prompts");
        std::fs::write(dir.join("greet_system.md"), "Be brief.\n").expect("writes");
        std::fs::write(dir.join("greet_user.md"), "Say hi to {name}.\n").expect("writes");

        let (system, user) = PromptLibrary::from_dir(&dir)
            .render_pair("greet", &[("name", "Mio")])
            .expect("pair loads");

        assert_eq!(system, "Be brief.");
        assert_eq!(user, "Say hi to Mio.");
    }

    #[test]
    fn missing_template_file_names_the_path() {
        let dir = temp_dir("missing");
        let err = PromptLibrary::from_dir(&dir)
            .render_pair("emotion", &[])
            .expect_err("file absent");

        assert_eq!(err.kind, ClientErrorKind::InvalidValue);
        assert!(err.message.contains("emotion_system.md"));
    }
}
