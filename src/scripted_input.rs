use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::session::{Command, Direction};

/// Replays a text file of keypresses, one per tick, for headless runs.
/// `.` is an explicit wait; `#` starts a comment line.
pub struct ScriptedInput {
    script_commands: Vec<Option<Command>>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut script_commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for char_code in trimmed_line.chars() {
                match char_to_command(char_code) {
                    Some(command) => script_commands.push(command),
                    None => eprintln!("Warning: Unknown key in script: {}", char_code),
                }
            }
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    /// Outer `None` means the script is exhausted; `Some(None)` is a
    /// scripted wait tick.
    pub fn next_command(&mut self) -> Option<Option<Command>> {
        if self.current_command_index < self.script_commands.len() {
            let command = self.script_commands[self.current_command_index];
            self.current_command_index += 1;
            Some(command)
        } else {
            None
        }
    }
}

fn char_to_command(c: char) -> Option<Option<Command>> {
    match c {
        'w' | 'W' | 'k' | 'K' => Some(Some(Command::Move(Direction::Up))),
        's' | 'S' | 'j' | 'J' => Some(Some(Command::Move(Direction::Down))),
        'a' | 'A' | 'h' | 'H' => Some(Some(Command::Move(Direction::Left))),
        'd' | 'D' | 'l' | 'L' => Some(Some(Command::Move(Direction::Right))),
        'p' | 'P' => Some(Some(Command::Confirm)),
        'q' | 'Q' => Some(Some(Command::Cancel)),
        'f' | 'F' => Some(Some(Command::Dash)),
        'x' | 'X' => Some(Some(Command::Destroy)),
        '.' => Some(None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempScript(std::path::PathBuf);

    impl Drop for TempScript {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn write_script(content: &str) -> TempScript {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "cavedash-script-{}-{:?}.txt",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::write(&path, content).unwrap();
        TempScript(path)
    }

    #[test]
    fn parses_moves_waits_and_comments() {
        let file = write_script("# warm up\npp\nd.d\n");
        let mut script = ScriptedInput::from_file(&file.0).unwrap();
        assert_eq!(script.next_command(), Some(Some(Command::Confirm)));
        assert_eq!(script.next_command(), Some(Some(Command::Confirm)));
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Right)))
        );
        assert_eq!(script.next_command(), Some(None));
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Right)))
        );
        assert_eq!(script.next_command(), None);
    }

    #[test]
    fn skips_unknown_characters() {
        let file = write_script("z!f\n");
        let mut script = ScriptedInput::from_file(&file.0).unwrap();
        assert_eq!(script.next_command(), Some(Some(Command::Dash)));
        assert_eq!(script.next_command(), None);
    }

    #[test]
    fn vi_keys_alias_wasd() {
        let file = write_script("hjkl\n");
        let mut script = ScriptedInput::from_file(&file.0).unwrap();
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Left)))
        );
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Down)))
        );
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Up)))
        );
        assert_eq!(
            script.next_command(),
            Some(Some(Command::Move(Direction::Right)))
        );
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let result = ScriptedInput::from_file("/nonexistent/cavedash-script.txt");
        assert!(result.is_err());
    }
}
