use chrono::{NaiveDate, Utc};
use maintenance_scheduler::{
    FrequencyUnit, MaintenanceRecord, MaintenanceRegister, ScheduleSpec, SchedulerConfig,
    load_register_from_csv, load_register_from_json, save_register_to_csv, save_register_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cell = |av: &AnyValue| -> String {
        match av {
            AnyValue::Null => String::new(),
            AnyValue::String(s) => s.to_string(),
            other => other.to_string(),
        }
    };

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for col in columns {
            row.push(col.get(row_idx).map(|av| cell(&av)).unwrap_or_default());
        }
        rows.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (ci, value) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(value.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, values: &[String]| {
        out.push('|');
        for (ci, value) in values.iter().enumerate() {
            out.push(' ');
            out.push_str(value);
            let pad = widths[ci].saturating_sub(value.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show register with due status\n  add <id> <vehicle> <program> <YYYY-MM-DD> <value> <unit> [business]\n                                     Upsert a maintenance record\n  delete <id>                        Delete a record\n  due <YYYY-MM-DD> <value> <unit> [business]\n                                     Compute a next due date\n  status [YYYY-MM-DD] [window]       Dashboard summary and critical alerts\n  window <days>                      Set the due-soon window\n  units                              List frequency units\n  save <json|csv> <path>             Persist register to disk\n  load <json|csv> <path>             Load register from disk\n  quit|exit                          Exit"
    );
}

fn print_units() {
    println!("Frequency units:");
    for unit in FrequencyUnit::ALL {
        println!("  {:<16} {}", unit.as_str(), unit.label());
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn parse_business_flag(input: Option<&str>) -> Result<bool, String> {
    match input.map(|s| s.to_ascii_lowercase()) {
        None => Ok(false),
        Some(s) if matches!(s.as_str(), "business" | "true" | "habiles") => Ok(true),
        Some(s) if matches!(s.as_str(), "calendar" | "false") => Ok(false),
        Some(other) => Err(format!("Invalid business flag '{other}' (business|calendar)")),
    }
}

fn show(register: &MaintenanceRegister, now: NaiveDate, window: u32) {
    match register.dataframe(now, window) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering register: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match SchedulerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            SchedulerConfig::default()
        }
    };
    let mut window = config.due_soon_window_days;
    let mut register = MaintenanceRegister::new();

    println!("Maintenance Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        // One clock sample per command, shared by everything it prints.
        let today = Utc::now().date_naive();
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "units" => print_units(),
            "show" => show(&register, today, window),
            "add" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 6 {
                    println!(
                        "Usage: add <id> <vehicle> <program> <YYYY-MM-DD> <value> <unit> [business]"
                    );
                    continue;
                }
                let Ok(id) = args[0].parse::<i32>() else {
                    println!("Invalid id");
                    continue;
                };
                let Some(base_date) = parse_date(args[3]) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let business = match parse_business_flag(args.get(6).copied()) {
                    Ok(flag) => flag,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let spec = match args[4]
                    .parse::<i64>()
                    .map_err(|_| "Invalid frequency value".to_string())
                    .and_then(|value| {
                        ScheduleSpec::from_raw(base_date, value, args[5], business)
                            .map_err(|e| e.to_string())
                    }) {
                    Ok(spec) => spec,
                    Err(e) => {
                        println!("Error: {e}");
                        continue;
                    }
                };
                let record = MaintenanceRecord::new(
                    id,
                    args[1],
                    args[2],
                    base_date,
                    spec.frequency_value,
                    spec.frequency_unit,
                )
                .with_business_days(business);
                match register.upsert(record) {
                    Ok(saved) => {
                        let next_due = saved.next_due.map(|d| d.to_string()).unwrap_or_default();
                        println!("Record {id} upserted (next due {next_due}).");
                        show(&register, today, window);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "delete" => match parts.next().map(str::parse::<i32>) {
                Some(Ok(id)) => {
                    if register.remove(id) {
                        println!("Deleted record {id}.");
                        show(&register, today, window);
                    } else {
                        println!("Record {id} not found.");
                    }
                }
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: delete <id>"),
            },
            "due" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 3 {
                    println!("Usage: due <YYYY-MM-DD> <value> <unit> [business]");
                    continue;
                }
                let Some(base_date) = parse_date(args[0]) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let Ok(value) = args[1].parse::<i64>() else {
                    println!("Invalid frequency value");
                    continue;
                };
                let business = match parse_business_flag(args.get(3).copied()) {
                    Ok(flag) => flag,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match ScheduleSpec::from_raw(base_date, value, args[2], business) {
                    Ok(spec) => println!("Next due: {}", spec.next_due_date()),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "status" => {
                let now = match parts.next() {
                    Some(s) => match parse_date(s) {
                        Some(d) => d,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => today,
                };
                let status_window = match parts.next().map(str::parse::<u32>) {
                    Some(Ok(w)) => w,
                    Some(Err(_)) => {
                        println!("Invalid window");
                        continue;
                    }
                    None => window,
                };
                let summary = register.dashboard(now, status_window);
                println!("Status as of {now} ({})", summary.to_cli_summary());
                for alert in &summary.critical_alerts {
                    println!(
                        "  [{}] #{} {} / {} due {} ({} days)",
                        alert.status,
                        alert.record.id,
                        alert.record.vehicle,
                        alert.record.program,
                        alert.next_due,
                        alert.days_until_due
                    );
                }
            }
            "window" => match parts.next().map(str::parse::<u32>) {
                Some(Ok(w)) => {
                    window = w;
                    println!("Due-soon window set to {w} days.");
                }
                _ => println!("Usage: window <days>"),
            },
            "save" | "load" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("json"), Some(path)) | (Some("csv"), Some(path)) => {
                        let is_json = format == Some("json");
                        if cmd == "save" {
                            let res = if is_json {
                                save_register_to_json(&register, path)
                            } else {
                                save_register_to_csv(&register, path)
                            };
                            match res {
                                Ok(_) => println!("Register saved to {path}."),
                                Err(e) => println!("Error saving register: {}", e),
                            }
                        } else {
                            let res = if is_json {
                                load_register_from_json(path)
                            } else {
                                load_register_from_csv(path)
                            };
                            match res {
                                Ok(loaded) => {
                                    register = loaded;
                                    println!("Register loaded from {path}.");
                                    show(&register, today, window);
                                }
                                Err(e) => println!("Error loading register: {}", e),
                            }
                        }
                    }
                    _ => println!("Usage: {cmd} <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
