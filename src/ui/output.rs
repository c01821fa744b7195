use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::STAR, text.style(theme().heading));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().icon),
        label.style(theme().label),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().heading));
}

pub fn badge(icon: &str, label: &str) {
    println!("  {} {}", icon, label.style(theme().badge));
}

pub fn metric(label: &str, value: u64) {
    println!("  {} {}", label.style(theme().label), value.style(theme().figure));
}
