use std::io::{self, BufRead};

use http_defs::date::{DateFormat, HttpDate};
use http_defs::logger::init_logger;
use http_defs::Config;
use tracing::{debug, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    // 命令行参数覆盖配置
    let mut inputs = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                let name = args.next().ok_or("--format requires a value")?;
                config.output.format = name.parse::<DateFormat>()?;
            }
            "--json" => config.output.json = true,
            _ => inputs.push(arg),
        }
    }

    init_logger(&config.logging.filter);
    debug!("Output config: {:?}", config.output);

    if inputs.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                inputs.push(line.to_string());
            }
        }
    }

    let mut failed = 0usize;
    for input in &inputs {
        match HttpDate::parse(input.trim()) {
            Ok(date) => println!("{}", render(input, &date, &config)?),
            Err(e) => {
                warn!("{}", e);
                failed += 1;
            }
        }
    }

    info!("Converted {} of {} dates", inputs.len() - failed, inputs.len());
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn render(input: &str, date: &HttpDate, config: &Config) -> Result<String, serde_json::Error> {
    let formatted = date.format(config.output.format);
    if !config.output.json {
        return Ok(formatted);
    }
    serde_json::to_string(&serde_json::json!({
        "input": input,
        "timestamp": date.timestamp(),
        "format": config.output.format,
        "formatted": formatted,
    }))
}
