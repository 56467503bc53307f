//! Interactive text menu over any async line source.

use lexicon_store::WordStore;
use lexicon_types::EntryLimits;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

const MENU: &str = "\
Lexicon dictionary
  1) List words
  2) Add a word
  3) Define a word
  4) Remove a word
  5) Look up a word
  6) Quit
";

/// Runs the menu until the user quits or the input reaches EOF.
pub async fn run_console<R, W>(
    store: &WordStore,
    limits: EntryLimits,
    input: R,
    output: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut console = Console {
        store,
        limits,
        lines: input.lines(),
        out: output,
    };
    console.run().await
}

struct Console<'a, R, W> {
    store: &'a WordStore,
    limits: EntryLimits,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn run(&mut self) -> io::Result<()> {
        loop {
            self.write(MENU).await?;
            let Some(choice) = self.prompt("Choice: ").await? else {
                break;
            };
            debug!("Console choice '{}'", choice);

            let keep_going = match choice.as_str() {
                "1" => self.list().await?,
                "2" => self.add().await?,
                "3" => self.define().await?,
                "4" => self.remove().await?,
                "5" => self.lookup().await?,
                "6" => {
                    self.write("Goodbye.\n").await?;
                    false
                }
                other => {
                    self.write(&format!("Unknown option '{other}'. Choose 1-6.\n"))
                        .await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.out.flush().await
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    /// Prints `label` and reads one trimmed line. `None` on EOF.
    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        self.write(label).await?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn list(&mut self) -> io::Result<bool> {
        match self.store.list().await {
            Ok(entries) if entries.is_empty() => self.write("The dictionary is empty.\n").await?,
            Ok(entries) => {
                let mut text = String::from("Words in the dictionary:\n");
                for entry in &entries {
                    text.push_str(&format!("  {entry}\n"));
                }
                self.write(&text).await?;
            }
            Err(e) => self.write(&format!("Error: {e}\n")).await?,
        }
        Ok(true)
    }

    async fn add(&mut self) -> io::Result<bool> {
        let Some(word) = self.prompt("New word: ").await? else {
            return Ok(false);
        };
        if let Err(e) = self.limits.validate_word(&word) {
            self.write(&format!("Error: {e}\n")).await?;
            return Ok(true);
        }
        if self.store.get(&word).await.is_ok() {
            self.write(&format!("Error: word already exists: {word}\n"))
                .await?;
            return Ok(true);
        }
        let Some(definition) = self.prompt("Definition: ").await? else {
            return Ok(false);
        };
        if let Err(e) = self.limits.validate_definition(&definition) {
            self.write(&format!("Error: {e}\n")).await?;
            return Ok(true);
        }

        let reply = match self.store.add(&word, &definition).await {
            Ok(()) => format!("Added '{word}': {definition}\n"),
            Err(e) => format!("Error: {e}\n"),
        };
        self.write(&reply).await?;
        Ok(true)
    }

    async fn define(&mut self) -> io::Result<bool> {
        let Some(word) = self.prompt("Word: ").await? else {
            return Ok(false);
        };
        if let Err(e) = self.store.get(&word).await {
            self.write(&format!("Error: {e}\n")).await?;
            return Ok(true);
        }
        let Some(definition) = self.prompt("New definition: ").await? else {
            return Ok(false);
        };
        if let Err(e) = self.limits.validate_definition(&definition) {
            self.write(&format!("Error: {e}\n")).await?;
            return Ok(true);
        }

        let reply = match self.store.edit(&word, &definition).await {
            Ok(()) => format!("Updated '{word}'.\n"),
            Err(e) => format!("Error: {e}\n"),
        };
        self.write(&reply).await?;
        Ok(true)
    }

    async fn remove(&mut self) -> io::Result<bool> {
        let Some(word) = self.prompt("Word to remove: ").await? else {
            return Ok(false);
        };
        let reply = match self.store.remove(&word).await {
            Ok(()) => format!("Removed '{word}'.\n"),
            Err(e) => format!("Error: {e}\n"),
        };
        self.write(&reply).await?;
        Ok(true)
    }

    async fn lookup(&mut self) -> io::Result<bool> {
        let Some(word) = self.prompt("Word: ").await? else {
            return Ok(false);
        };
        let reply = match self.store.get(&word).await {
            Ok(entry) => format!("{entry}\n"),
            Err(e) => format!("Error: {e}\n"),
        };
        self.write(&reply).await?;
        Ok(true)
    }
}
