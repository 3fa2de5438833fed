use std::io::Write;
use std::process::{Command, Stdio};

use crate::lemma::{LemmaError, Lemmatizer, Token};

pub const NAME: &str = "command";

/// Lemmatizer that shells out to an external program once per span.
///
/// The program receives the span on stdin and must print a JSON array of
/// `{"text": ..., "lemma": ..., "upos": ...}` objects on stdout.
#[derive(Debug, Clone)]
pub struct CommandLemmatizer {
    argv: Vec<String>,
}

impl CommandLemmatizer {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

impl Lemmatizer for CommandLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<Token>, LemmaError> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| LemmaError::Process("empty lemmatizer command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LemmaError::Process(format!("failed to spawn {program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| LemmaError::Process(format!("failed to write to {program}: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| LemmaError::Process(format!("failed to wait for {program}: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LemmaError::Process(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str::<Vec<Token>>(stdout.trim())
            .map_err(|e| LemmaError::Output(format!("{program}: {e}")))
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
