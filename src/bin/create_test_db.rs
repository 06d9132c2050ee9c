use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CalendarMonth, Expense, ExpenseName, get_timezone, insert_expense, open_or_create,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The canonical name of the timezone used to decide which month it is.
    #[arg(long, env = "EXPENSE_TRACKER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,
}

/// The demo expenses recorded in the current month.
const THIS_MONTH: [(&str, &str); 4] = [
    ("Coffee", "3.50"),
    ("Groceries", "64.20"),
    ("Bus pass", "25.00"),
    ("Lunch", "12.75"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let Some(timezone) = get_timezone(&args.timezone) else {
        eprintln!("\"{}\" is not a valid canonical timezone.", args.timezone);
        exit(1);
    };

    println!("Creating database at {output_path:#?}");
    let conn = open_or_create(output_path)?;

    let now = OffsetDateTime::now_utc();
    let this_month = CalendarMonth::current(timezone);
    println!("Creating expenses for {this_month}...");

    for (index, (name, amount)) in THIS_MONTH.into_iter().enumerate() {
        // Spread the expenses out but never before the start of the month.
        let date = this_month
            .instants()
            .start
            .max(now - Duration::hours(index as i64));

        insert_expense(
            Expense::build(ExpenseName::new(name)?, amount.parse()?, date),
            &conn,
        )?;
    }

    let last_month = this_month.previous();
    println!("Creating an expense for {last_month}...");
    insert_expense(
        Expense::build(
            ExpenseName::new("Rent")?,
            "950.00".parse()?,
            last_month.instants().start + Duration::days(1),
        ),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
