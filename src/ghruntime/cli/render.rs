use colored::Colorize;
use ghruntime::api::{CmdMessage, MessageLevel};

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut output = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.normal(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        output.push_str(&line.to_string());
        output.push('\n');
    }
    output
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

pub fn render_details(details: &serde_json::Value) -> String {
    let body = serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string());
    format!("{} {}\n", "App Details:".bold(), body)
}
