/// Example program to print the loaded configuration
///
/// Run with: cargo run -p malleable-config --example print_config

fn main() {
    let config = malleable_config::MalleableConfig::load();

    println!("=== Malleable Configuration ===\n");

    println!("Window Settings:");
    println!("  Title: {}", config.window.title);
    println!("  Size: {}x{}", config.window.width, config.window.height);
    println!("  Minimum: {}x{}", config.window.min_width, config.window.min_height);
    println!();

    println!("Chat Settings:");
    println!("  Send Policy: {:?}", config.chat.send_policy);
    println!("  Abort Timeout: {}ms", config.chat.abort_timeout_ms);
    println!("  Panel Width: {}", config.chat.panel_width);
    println!();

    println!("Appearance:");
    println!("  Theme: {}", config.appearance.theme);
    println!();

    println!("Assistant:");
    println!("  Working Directory: {:?}", config.assistant.working_directory);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
