//! Utility to set the profile's body data from the command line
//!
//! Usage: set_profile <age> <weight_kg> <height_cm> <gender> [activity_level] [goal]

use nutrilog::config::Config;
use nutrilog::models::ProfileUpdate;
use nutrilog::nutrition::energy::{ActivityLevel, Gender, WeightGoal};

const USAGE: &str =
    "Usage: set_profile <age> <weight_kg> <height_cm> <male|female|other> [activity_level] [goal]";

fn parse_args(args: &[String]) -> Result<ProfileUpdate, String> {
    if args.len() < 4 {
        return Err(USAGE.to_string());
    }

    let age: u32 = args[0].parse().map_err(|_| format!("Invalid age: {}", args[0]))?;
    let weight_kg: f64 = args[1].parse().map_err(|_| format!("Invalid weight: {}", args[1]))?;
    let height_cm: f64 = args[2].parse().map_err(|_| format!("Invalid height: {}", args[2]))?;
    let gender = Gender::parse(&args[3]).ok_or_else(|| format!("Invalid gender: {}", args[3]))?;

    Ok(ProfileUpdate {
        age: Some(age),
        weight_kg: Some(weight_kg),
        height_cm: Some(height_cm),
        gender: Some(gender),
        activity_level: args.get(4).map(|s| ActivityLevel::parse(s)),
        goal: args.get(5).map(|s| WeightGoal::parse(s)),
        ..Default::default()
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let update = parse_args(&args)?;

    let config = Config::from_env()?;
    let db_path = config.database_path;
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = nutrilog::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        nutrilog::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let profile = nutrilog::tools::profile::set_profile(&database, update)?;
    println!("Profile set:");
    println!("  Age: {:?}", profile.age);
    println!("  Weight: {:?} kg", profile.weight_kg);
    println!("  Height: {:?} cm", profile.height_cm);
    println!("  Activity: {}", profile.activity_level.as_str());
    println!("  Goal: {}", profile.goal.as_str());
    println!("  Daily target: {:.0} kcal", profile.daily_calories_target);

    Ok(())
}
