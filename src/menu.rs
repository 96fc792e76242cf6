use std::io::{self, BufRead, Write};

use crate::commands::Session;
use crate::state::SortKey;

const CHOICE: &str = "Your choice: ";

impl<R: BufRead, W: Write> Session<R, W> {
    /// Main menu loop; returns when the user picks exit.
    pub fn run_menu(&mut self) -> io::Result<()> {
        self.console_mut().say("=== My list! ===")?;
        loop {
            let console = self.console_mut();
            console.say("\nMain menu:")?;
            console.say("1 - Create task")?;
            console.say("2 - View tasks")?;
            console.say("3 - Update task")?;
            console.say("4 - Delete task")?;
            console.say("0 - Exit")?;
            match console.ask_choice(CHOICE, &[0, 1, 2, 3, 4])? {
                0 => {
                    console.say("See you!")?;
                    log::info!("menu exit");
                    return Ok(());
                }
                1 => self.create_task()?,
                2 => self.run_view_menu()?,
                3 => self.update_task()?,
                4 => self.delete_task()?,
                _ => continue,
            }
        }
    }

    fn run_view_menu(&mut self) -> io::Result<()> {
        loop {
            let console = self.console_mut();
            console.say("\nView:")?;
            console.say("1 - all")?;
            console.say("2 - by status")?;
            console.say("3 - by priority")?;
            console.say("4 - search")?;
            console.say("5 - important only")?;
            console.say("0 - back")?;
            match console.ask_choice(CHOICE, &[0, 1, 2, 3, 4, 5])? {
                0 => return Ok(()),
                1 => self.list_all()?,
                2 => self.list_sorted(SortKey::Status)?,
                3 => self.list_sorted(SortKey::Priority)?,
                4 => self.search_tasks()?,
                5 => self.list_important()?,
                _ => continue,
            }
        }
    }
}
