// Entry point and high-level CLI flow.
//
// - Option [1] fetches the emergency report list and keeps it in memory.
// - Option [2] rolls the reports up by municipality and barangay for the
//   configured province, prints the ranking and exports it.
// - After a summary is generated, the user can go back to the menu or exit.
use chrono::Utc;
use log::info;
use once_cell::sync::Lazy;
use relief_summary::config::AppConfig;
use relief_summary::feed::{self, Feed, SummaryView};
use relief_summary::summary::SummaryRules;
use relief_summary::{loader, output, util};
use std::io::{self, BufRead, Write};
use std::sync::{Mutex, MutexGuard};

// Reports are fetched once and summarized as many times as the user asks.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        config: AppConfig::from_env(),
        feed: Feed::Loading,
    })
});

struct AppState {
    config: AppConfig,
    feed: Feed,
}

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One trimmed line of input, or `None` once the input is closed or unreadable.
fn read_line_from(input: &mut impl BufRead, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_line(prompt: &str) -> Option<String> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// Ask whether to return to the menu after a summary. `true` for `Y`;
/// closed input counts as `N`.
fn back_to_menu_from(input: &mut impl BufRead) -> bool {
    loop {
        let Some(answer) = read_line_from(input, "Back to Report Selection (Y/N): ") else {
            println!();
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn prompt_back_to_menu() -> bool {
    back_to_menu_from(&mut io::stdin().lock())
}

/// Option [1]. A failed fetch leaves the app with no data rather than
/// stopping it.
fn handle_load() {
    let path = app_state().config.reports_path.clone();
    let feed = match loader::load_reports(&path) {
        Ok((feed, load_report)) => {
            match &feed {
                Feed::Ready(_) => {
                    println!(
                        "Fetched {} emergency reports from {}",
                        util::format_int(load_report.total_rows),
                        path
                    );
                    if load_report.unreadable_rows > 0 {
                        println!(
                            "Note: {} entries were not readable reports.",
                            util::format_int(load_report.unreadable_rows)
                        );
                    }
                    if load_report.defaulted_people + load_report.defaulted_timestamps > 0 {
                        println!(
                            "Info: defaulted {} head counts and {} timestamps.",
                            util::format_int(load_report.defaulted_people),
                            util::format_int(load_report.defaulted_timestamps)
                        );
                    }
                }
                _ => println!("{} does not contain a list of reports.", path),
            }
            feed
        }
        Err(e) => {
            eprintln!("Failed to fetch emergency reports: {}", e);
            Feed::Invalid
        }
    };
    println!();
    app_state().feed = feed;
}

/// Option [2]. Prints the ranked summary and writes the CSV/JSON exports.
fn handle_generate_summary() {
    let (config, feed) = {
        let state = app_state();
        (state.config.clone(), state.feed.clone())
    };
    let rules = SummaryRules::new(&config.target_province, &config.pending_marker);
    let view = feed::summarize(&feed, &rules, Utc::now());

    if let Some(msg) = output::view_message(&view) {
        println!("{}", msg);
        if view == SummaryView::Loading {
            println!("(Load the reports first with option 1.)");
        }
        println!();
        return;
    }
    let SummaryView::Ready(summary) = view else {
        return;
    };

    output::print_summary(&summary, config.preview_rows);

    let exports = [
        (
            "municipality_summary.csv",
            output::write_csv(
                &config.output_path("municipality_summary.csv"),
                &output::municipality_rows(&summary),
            ),
        ),
        (
            "barangay_summary.csv",
            output::write_csv(
                &config.output_path("barangay_summary.csv"),
                &output::barangay_rows(&summary, None),
            ),
        ),
        (
            "emergency_summary.json",
            output::write_json(&config.output_path("emergency_summary.json"), &summary),
        ),
    ];
    for (file, result) in exports {
        match result {
            Ok(()) => info!("Wrote {}", file),
            Err(e) => eprintln!("Write error ({}): {}", file, e),
        }
    }

    if !summary.diagnostics.is_empty() {
        println!(
            "Note: {} reports skipped due to format or processing errors.",
            util::format_int(summary.diagnostics.len())
        );
        for d in summary.diagnostics.iter().take(config.preview_rows) {
            println!("  {}", d);
        }
    }
    println!(
        "Summary: {} affected across {} municipalities / {} barangays \
         ({} of {} reports in {}).\n",
        util::format_int(summary.stats.total_people),
        util::format_int(summary.stats.municipalities),
        util::format_int(summary.stats.barangays),
        util::format_int(summary.stats.admitted_reports),
        util::format_int(summary.stats.total_reports),
        summary.province
    );
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    info!("Summarizing emergency reports for {}", app_state().config.target_province);

    loop {
        println!("Emergency Summary");
        println!("[1] Load the reports");
        println!("[2] Generate Summary\n");
        let Some(choice) = read_line("Enter choice: ") else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_summary();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
