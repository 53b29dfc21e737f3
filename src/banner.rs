// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
  _            _
 | |_ ___  ___| |_ __ _  ___ _ __
 | __/ _ \/ __| __/ _` |/ _ \ '_ \
 | ||  __/\__ \ || (_| |  __/ | | |
  \__\___||___/\__\__, |\___|_| |_|
                  |___/

    API Test Scenario & Pytest Generator
"#;
    println!("{}", banner);
}
