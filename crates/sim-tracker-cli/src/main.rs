use std::{env, process};

use sim_tracker_config::Settings;
use sim_tracker_engine::{
    BlockFormat, MemoryStore, RenderError, RenderOptions, RenderSessionState, Store,
    TrackerViewModel, display, format::scan, render_message,
};

mod store;

use store::JsonFileStore;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--convert") => {
            if args.len() != 4 {
                usage(&args[0]);
            }
            run_convert(&args[2], &args[3]);
        }
        Some(_) if args.len() <= 3 => {
            run_render(&args[1], args.get(2).map(String::as_str));
        }
        _ => usage(&args[0]),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <message-file> [store-file]");
    eprintln!("       {program} --convert <json|yaml> <block-file>");
    process::exit(1);
}

fn load_settings() -> Settings {
    match Settings::load() {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    }
}

/// Re-encodes a tracker block file into the requested format.
fn run_convert(target: &str, block_file: &str) {
    let settings = load_settings();
    let target = match target {
        "json" => BlockFormat::Json,
        "yaml" => BlockFormat::Yaml,
        other => {
            eprintln!("Error: Unsupported format '{other}' (expected json or yaml)");
            process::exit(1);
        }
    };

    let body = read_file(block_file);
    match sim_tracker_engine::convert_block(&body, target, &settings.code_block_identifier) {
        Ok(block) => println!("{block}"),
        Err(e) => {
            eprintln!("Error: Could not convert tracker block: {e}");
            process::exit(1);
        }
    }
}

/// Runs one render pass over a chat message file and prints the card markup.
fn run_render(message_file: &str, store_file: Option<&str>) {
    let settings = load_settings();
    if !settings.enabled {
        log::info!("tracker rendering is disabled in settings");
        return;
    }

    let message = read_file(message_file);

    let mut file_store = store_file.map(JsonFileStore::load);
    let mut memory_store = MemoryStore::new();
    let store: &mut dyn Store = match file_store.as_mut() {
        Some(store) => store,
        None => &mut memory_store,
    };

    let options = RenderOptions {
        identifier: settings.code_block_identifier.clone(),
        default_bg_color: settings.default_bg_color.clone(),
        show_thought_bubble: settings.show_thought_bubble,
        persistence_enabled: store_file.is_some(),
    };

    let mut session = RenderSessionState::new();
    match render_message(&message, &options, store, &mut session) {
        Ok(Some(view_model)) => {
            if settings.hide_tracker_blocks {
                log::debug!(
                    "display text without tracker blocks:\n{}",
                    scan::display_text(&message, &settings.code_block_identifier, true)
                );
            }
            println!("{}", render_cards(&view_model));
        }
        Ok(None) => {
            eprintln!("No tracker data found in {message_file}");
        }
        Err(RenderError::NoUsableData) => {
            log::error!("message carried tracker blocks but none were usable");
            println!("{}", display::error_fragment());
        }
        Err(e) => {
            log::error!("tracker rendering failed: {e}");
            process::exit(1);
        }
    }
    session.finish_generation();

    if let Some(store) = &file_store
        && let Err(e) = store.save()
    {
        eprintln!("Error: Failed to save variable store: {e}");
        process::exit(1);
    }
}

/// Minimal stand-in for the host's card template: one container with a card
/// section per character.
fn render_cards(view_model: &TrackerViewModel) -> String {
    let mut out = String::from("<div class=\"sim-tracker-container\">\n");
    for card in &view_model.cards {
        let name = html_escape::encode_text(&card.character_name);
        let date = html_escape::encode_text(&card.current_date);
        let time = html_escape::encode_text(&card.current_time);

        out.push_str(&format!(
            "<div class=\"sim-tracker-card\" style=\"background: {}\">\n",
            card.bg_color
        ));
        out.push_str(&format!("<div class=\"card-name\">{name}"));
        if let Some(icon) = &card.health_icon {
            out.push_str(&format!(" <span class=\"card-health\">{icon}</span>"));
        }
        out.push_str(&format!(
            " <span class=\"card-react\">{}</span></div>\n",
            card.reaction_emoji
        ));
        out.push_str(&format!(
            "<div class=\"card-datetime\">{date} • {time}</div>\n"
        ));
        if card.show_thought_bubble {
            out.push_str(&format!(
                "<div class=\"card-thought\">{}</div>\n",
                html_escape::encode_text(&card.internal_thought)
            ));
        }
        out.push_str(&card.dynamic_stats_html);
        out.push_str("\n</div>\n");
    }
    out.push_str("</div>");
    out
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Could not read {path}: {e}");
            process::exit(1);
        }
    }
}
