use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use anyhow::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Play,
    Pause,
    Toggle,
    Reset,
    Quit,
}

impl Intent {
    pub fn parse(line: &str) -> Result<Self> {
        Ok(match line.trim().to_lowercase().as_str() {
            "p" | "play" => Intent::Play,
            "s" | "pause" => Intent::Pause,
            // Just hitting enter flips between playing and pausing
            "" | "t" | "toggle" => Intent::Toggle,
            "r" | "reset" => Intent::Reset,
            "q" | "quit" => Intent::Quit,
            x => bail!("Unknown command {:?}; try play, pause, toggle, reset, or quit", x),
        })
    }
}

/// Reads commands from stdin on a separate thread. Playback itself stays on the caller's thread;
/// the channel disconnects once stdin closes.
pub fn listen_stdin() -> mpsc::Receiver<Intent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    error!("Couldn't read stdin: {}", err);
                    break;
                }
            };
            match Intent::parse(&line) {
                Ok(intent) => {
                    if tx.send(intent).is_err() {
                        break;
                    }
                }
                Err(err) => warn!("{}", err),
            }
        }
        debug!("Stopped listening to stdin");
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Intent::parse("p").unwrap(), Intent::Play);
        assert_eq!(Intent::parse("  Pause \n").unwrap(), Intent::Pause);
        assert_eq!(Intent::parse("").unwrap(), Intent::Toggle);
        assert_eq!(Intent::parse("RESET").unwrap(), Intent::Reset);
        assert_eq!(Intent::parse("q").unwrap(), Intent::Quit);
        assert!(Intent::parse("faster").is_err());
    }
}
