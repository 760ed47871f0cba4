//! Interactive front-desk terminal: five views over the clinic-desk core,
//! driven synchronously from a prompt loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use clinic_desk_core::{
    phone_issues, AdminConfig, AuthSession, BackupManager, Gender, JsonStore, LedgerManager,
    PatientDraft, SearchFilter, TestCatalogManager, TestEntry,
};

#[derive(Parser)]
#[command(name = "clinic-desk", about = "Clinic front desk: patients, earnings, backups")]
struct Args {
    /// Directory holding the JSON documents
    #[arg(long, default_value = "data", env = "CLINIC_DATA_DIR")]
    data_dir: PathBuf,

    /// Directory holding XML backups
    #[arg(long, default_value = "backup", env = "CLINIC_BACKUP_DIR")]
    backup_dir: PathBuf,
}

struct App {
    ledger: LedgerManager,
    catalog: TestCatalogManager,
    backups: BackupManager,
    admin: AdminConfig,
    session: AuthSession,
    editor: DefaultEditor,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(data_dir = %args.data_dir.display(), "clinic-desk starting");
    let store = JsonStore::open(&args.data_dir).context("opening data directory")?;
    let mut app = App {
        ledger: LedgerManager::open(store.clone()).context("loading patient ledger")?,
        catalog: TestCatalogManager::open(store.clone()).context("loading test catalog")?,
        backups: BackupManager::open(&args.backup_dir).context("opening backup directory")?,
        admin: AdminConfig::load(&store).context("loading admin config")?,
        session: AuthSession::new(),
        editor: DefaultEditor::new()?,
    };

    println!("Clinic Management System");
    loop {
        println!();
        println!("1) Add Patient  2) View Patients  3) Earnings  4) Admin Panel  5) Backup  q) Quit");
        let Some(choice) = prompt(&mut app.editor, "> ")? else {
            break;
        };
        match choice.trim() {
            "1" => add_patient(&mut app)?,
            "2" => view_patients(&mut app)?,
            "3" => earnings(&mut app)?,
            "4" => admin_panel(&mut app)?,
            "5" => backup(&mut app)?,
            "q" | "quit" | "exit" => break,
            "" => {}
            other => println!("unknown choice: {other}"),
        }
    }
    Ok(())
}

// --- Add Patient -----------------------------------------------------------

fn add_patient(app: &mut App) -> Result<()> {
    println!("-- Add Patient Record --");
    let Some(name) = prompt(&mut app.editor, "Patient name: ")? else {
        return Ok(());
    };
    let Some(age) = prompt_u32(&mut app.editor, "Age (0-120): ", 0, 120)? else {
        return Ok(());
    };
    let Some(phone) = prompt(&mut app.editor, "Phone number: ")? else {
        return Ok(());
    };
    // advisory only; saving is never blocked on the phone shape
    for issue in phone_issues(phone.trim()) {
        println!("  warning: {issue}");
    }
    let Some(gender) = prompt_gender(&mut app.editor)? else {
        return Ok(());
    };
    let Some(symptoms) = prompt(&mut app.editor, "Symptoms: ")? else {
        return Ok(());
    };

    let mut tests = Vec::new();
    let catalog_entries: Vec<(String, f64)> = app
        .catalog
        .catalog()
        .iter()
        .map(|(n, p)| (n.to_string(), p))
        .collect();
    for (test_name, base_price) in catalog_entries {
        let Some(include) = prompt(
            &mut app.editor,
            &format!("Include {test_name} (base price {base_price})? [y/N] "),
        )?
        else {
            return Ok(());
        };
        if !include.trim().eq_ignore_ascii_case("y") {
            continue;
        }
        let Some(value) = prompt(&mut app.editor, &format!("Result for {test_name}: "))? else {
            return Ok(());
        };
        let Some(cost) =
            prompt_f64(&mut app.editor, &format!("Price for {test_name}: "), Some(base_price))?
        else {
            return Ok(());
        };
        tests.push(TestEntry {
            name: test_name,
            value: value.trim().to_string(),
            cost,
        });
    }

    let Some(fee) = prompt_f64(&mut app.editor, "Consultation fee: ", Some(200.0))? else {
        return Ok(());
    };

    let draft = PatientDraft {
        name: name.trim().to_string(),
        age,
        gender,
        phone: phone.trim().to_string(),
        symptoms: symptoms.trim().to_string(),
        tests,
        consultation_fee: fee,
    };
    println!("Total amount: {}", draft.total_amount());

    let Some(confirm) = prompt(&mut app.editor, "Save this patient record? [y/N] ")? else {
        return Ok(());
    };
    if !confirm.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return Ok(());
    }
    match app.ledger.create_record(draft) {
        Ok(record) => println!("Saved record {} for {}.", record.record_id, record.name),
        Err(e) => println!("Not saved: {e}"),
    }
    Ok(())
}

// --- View Patients ---------------------------------------------------------

fn view_patients(app: &mut App) -> Result<()> {
    println!("-- Patient Records --");
    if app.ledger.patients().is_empty() {
        println!("No patient records yet.");
        return Ok(());
    }
    let Some(query) = prompt(&mut app.editor, "Search by name or phone (blank for all): ")? else {
        return Ok(());
    };
    let filter = SearchFilter {
        query: Some(query),
        date_range: None,
    };
    let ids: Vec<String> = app
        .ledger
        .search(&filter)
        .iter()
        .rev() // newest first
        .map(|p| p.record_id.clone())
        .collect();
    println!("Showing {} record(s)", ids.len());
    for (i, id) in ids.iter().enumerate() {
        let Some(p) = app.ledger.record(id) else {
            continue;
        };
        println!(
            "{}. {} - {} on {}{}",
            i + 1,
            p.name,
            p.total_amount,
            p.date,
            p.time.as_deref().map(|t| format!(" {t}")).unwrap_or_default()
        );
        println!("   age {}, {}, phone {}", p.age, p.gender, p.phone);
        if !p.symptoms.is_empty() {
            println!("   symptoms: {}", p.symptoms);
        }
        for t in &p.tests {
            println!("   test {}: {} ({})", t.name, t.value, t.cost);
        }
        println!("   consultation {}, total {}", p.consultation_fee, p.total_amount);
    }

    let Some(pick) = prompt(&mut app.editor, "Delete record number (blank to skip): ")? else {
        return Ok(());
    };
    let pick = pick.trim();
    if pick.is_empty() {
        return Ok(());
    }
    match pick.parse::<usize>() {
        Ok(n) if (1..=ids.len()).contains(&n) => {
            let removed = app.ledger.delete_record(&ids[n - 1])?;
            println!("Deleted record for {}.", removed.name);
        }
        _ => println!("No such record number."),
    }
    Ok(())
}

// --- Earnings --------------------------------------------------------------

fn earnings(app: &mut App) -> Result<()> {
    println!("-- Clinic Earnings Summary --");
    if !app.session.earnings_unlocked() {
        let Some(input) = prompt(&mut app.editor, "Password: ")? else {
            return Ok(());
        };
        if !app.session.unlock_earnings(&app.admin, input.trim()) {
            println!("Incorrect password.");
            return Ok(());
        }
    }
    if app.ledger.earnings().is_empty() {
        println!("No earnings data available yet.");
        return Ok(());
    }
    let summary = app.ledger.earnings_summary(chrono::Local::now().date_naive());
    println!("Today's earnings: {}", summary.today);
    println!("Last 7 days:      {}", summary.last_7_days);
    println!("This month:       {}", summary.this_month);
    for group in &summary.by_date {
        println!("{} - {}", group.date, group.total);
        for (i, p) in group.patients.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, p.name, p.total_amount);
        }
    }
    Ok(())
}

// --- Admin Panel -----------------------------------------------------------

fn admin_panel(app: &mut App) -> Result<()> {
    println!("-- Admin Panel --");
    if !app.session.admin_unlocked() {
        let Some(input) = prompt(&mut app.editor, "Admin password: ")? else {
            return Ok(());
        };
        if !app.session.unlock_admin(&app.admin, input.trim()) {
            println!("Incorrect password.");
            return Ok(());
        }
    }
    println!("Admin access granted.");
    loop {
        println!("Tests:");
        for (name, price) in app.catalog.catalog().iter() {
            println!("  {name}: {price}");
        }
        println!("a) add  e) edit  d) delete  b) back");
        let Some(choice) = prompt(&mut app.editor, "admin> ")? else {
            return Ok(());
        };
        match choice.trim() {
            "a" => {
                let Some(name) = prompt(&mut app.editor, "New test name: ")? else {
                    return Ok(());
                };
                let Some(price) = prompt_f64(&mut app.editor, "Price: ", None)? else {
                    return Ok(());
                };
                match app.catalog.add_test(&name, price) {
                    Ok(()) => println!("Test added."),
                    Err(e) => println!("Not added: {e}"),
                }
            }
            "e" => {
                let Some(old) = prompt(&mut app.editor, "Test to edit: ")? else {
                    return Ok(());
                };
                let Some(new) = prompt(&mut app.editor, "New name (blank to keep): ")? else {
                    return Ok(());
                };
                let Some(price) = prompt_f64(&mut app.editor, "New price: ", None)? else {
                    return Ok(());
                };
                let old = old.trim();
                let new = if new.trim().is_empty() { old } else { new.trim() };
                match app.catalog.rename_or_reprice(old, new, price) {
                    Ok(()) => println!("Test updated."),
                    Err(e) => println!("Not updated: {e}"),
                }
            }
            "d" => {
                let Some(name) = prompt(&mut app.editor, "Test to delete: ")? else {
                    return Ok(());
                };
                match app.catalog.delete_test(name.trim()) {
                    Ok(()) => println!("Test deleted."),
                    Err(e) => println!("Not deleted: {e}"),
                }
            }
            "b" | "" => return Ok(()),
            other => println!("unknown choice: {other}"),
        }
    }
}

// --- Backup ----------------------------------------------------------------

fn backup(app: &mut App) -> Result<()> {
    println!("-- Manual XML Backup --");
    let Some(go) = prompt(&mut app.editor, "Backup patient records now? [y/N] ")? else {
        return Ok(());
    };
    if go.trim().eq_ignore_ascii_case("y") {
        match app.backups.write_backup_today(app.ledger.patients()) {
            Ok(path) => println!("Backup saved as {}", path.display()),
            Err(e) => println!("Backup failed: {e}"),
        }
    }
    println!("Existing backups:");
    for path in app.backups.list_backups()? {
        println!("  {}", path.display());
    }
    Ok(())
}

// --- Prompt helpers --------------------------------------------------------

/// Read one line; `None` means the operator cancelled (ctrl-c/ctrl-d).
fn prompt(editor: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    match editor.readline(label) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn prompt_f64(
    editor: &mut DefaultEditor,
    label: &str,
    default: Option<f64>,
) -> Result<Option<f64>> {
    loop {
        let Some(line) = prompt(editor, label)? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.is_empty() {
            if let Some(d) = default {
                return Ok(Some(d));
            }
        }
        match line.parse::<f64>() {
            Ok(v) if v >= 0.0 => return Ok(Some(v)),
            _ => println!("enter a non-negative number"),
        }
    }
}

fn prompt_u32(editor: &mut DefaultEditor, label: &str, min: u32, max: u32) -> Result<Option<u32>> {
    loop {
        let Some(line) = prompt(editor, label)? else {
            return Ok(None);
        };
        match line.trim().parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => return Ok(Some(v)),
            _ => println!("enter a number between {min} and {max}"),
        }
    }
}

fn prompt_gender(editor: &mut DefaultEditor) -> Result<Option<Gender>> {
    loop {
        let Some(line) = prompt(editor, "Gender [m/f/o]: ")? else {
            return Ok(None);
        };
        match line.trim().to_lowercase().as_str() {
            "m" | "male" => return Ok(Some(Gender::Male)),
            "f" | "female" => return Ok(Some(Gender::Female)),
            "o" | "other" => return Ok(Some(Gender::Other)),
            _ => println!("enter m, f, or o"),
        }
    }
}
