use bunkr_core::{ActionKind, Overview, Subject, SubjectDto, Thresholds};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::{Rows};

// Helper struct for Table Row
#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subject")]
    name: String,
    #[tabled(rename = "Att")]
    attended: u32,
    #[tabled(rename = "Miss")]
    missed: u32,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Bunk@Safe")]
    safe: u32,
    #[tabled(rename = "Bunk@Min")]
    minimum: u32,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Att")]
    attended: String,
    #[tabled(rename = "Miss")]
    missed: String,
    #[tabled(rename = "Running")]
    running: String,
}

fn subject_row(dto: &SubjectDto) -> SubjectRow {
    // flag anything under target
    let percent = if dto.below_target {
        format!("{}!", dto.percent)
    } else {
        dto.percent.to_string()
    };
    let target = if dto.custom_target {
        format!("{}*", dto.target)
    } else {
        dto.target.to_string()
    };

    SubjectRow {
        id: dto.short_id.clone(),
        name: dto.name.clone(),
        attended: dto.attended,
        missed: dto.missed,
        percent,
        target,
        safe: dto.allowance_safe,
        minimum: dto.allowance_minimum,
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    println!("{}", table);
}

pub fn show_subjects(subjects: &[SubjectDto], thresholds: &Thresholds) {
    let rows: Vec<SubjectRow> = subjects.iter().map(subject_row).collect();
    print_table(rows);
    println!(
        "Bunk@Safe = skips left at {}, Bunk@Min = skips left at {}, * = own target, ! = below target",
        thresholds.safe, thresholds.minimum
    );
}

fn weight_cell(weight: u32) -> String {
    if weight > 0 { format!("+{}", weight) } else { "-".to_string() }
}

// Saturates the same way the ledger counters do.
fn advance(totals: (u32, u32), action: ActionKind) -> (u32, u32) {
    let (a, m) = action.weights();
    (totals.0.saturating_add(a), totals.1.saturating_add(m))
}

// Running totals are replayed from the history alone, so they can differ
// from the stored counters if those were edited by hand.
fn history_rows(history: &[ActionKind]) -> Vec<HistoryRow> {
    let mut totals = (0u32, 0u32);
    history
        .iter()
        .enumerate()
        .map(|(i, &action)| {
            totals = advance(totals, action);
            let (attended, missed) = totals;
            let (a, m) = action.weights();
            HistoryRow {
                index: i + 1,
                action: action.label().to_string(),
                attended: weight_cell(a),
                missed: weight_cell(m),
                running: format!("{}/{}", attended, u64::from(attended) + u64::from(missed)),
            }
        })
        .collect()
}

pub fn show_history(subject: &Subject) {
    let history = &subject.ledger.history;
    println!(
        "\n\x1b[1;36m{}\x1b[0m ({} attended, {} missed, {}%)",
        subject.name,
        subject.ledger.attended_count,
        subject.ledger.missed_count,
        subject.ledger.attendance_percent()
    );

    if history.is_empty() {
        println!("No actions recorded yet.");
        return;
    }

    print_table(history_rows(history));
}

pub fn show_overview(overview: &Overview) {
    println!(
        "Subjects: {}  Attended: {}  Missed: {}  Overall: {}%{}",
        overview.subject_count,
        overview.total_attended,
        overview.total_missed,
        overview.overall_percent,
        if overview.overall_meets_target { "" } else { " (below target)" }
    );

    if overview.at_risk.is_empty() {
        println!("All subjects are at or above target.");
        return;
    }

    println!("\n\x1b[1;31mBelow target\x1b[0m");
    let rows: Vec<SubjectRow> = overview.at_risk.iter().map(subject_row).collect();
    print_table(rows);
}
