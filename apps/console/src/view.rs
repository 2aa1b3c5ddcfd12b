//! Terminal rendering of controller view updates.

use client_core::{
    view::{ProjectListView, Screen},
    ViewPort, ViewUpdate,
};
use tracing::debug;

pub struct ConsoleView;

impl ViewPort for ConsoleView {
    fn render(&self, update: ViewUpdate) {
        match update {
            ViewUpdate::Screen(Screen::Auth) => println!("== sign in =="),
            ViewUpdate::Screen(Screen::App) => println!("== projects =="),
            ViewUpdate::AuthForm(form) => println!(
                "{} ({} {})",
                form.title, form.toggle_prompt, form.toggle_label
            ),
            ViewUpdate::AuthFormReset => debug!("auth form reset"),
            ViewUpdate::ProjectList(list) => match &list {
                ProjectListView::Cards(cards) => {
                    for card in cards {
                        println!("- {} [{}]", card.name, card.status);
                        println!("    {}", card.description);
                    }
                }
                other => println!("{}", other.placeholder().unwrap_or_default()),
            },
            ViewUpdate::StatusLogReset => println!("-- status --"),
            ViewUpdate::StatusLine(line) => {
                println!("[{}] {}", line.at.format("%H:%M:%S"), line.text)
            }
            ViewUpdate::FinalOutput(url) => println!("Repository: {url}"),
            ViewUpdate::Alert(err) => eprintln!("! {err}"),
        }
    }
}
