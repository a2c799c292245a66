use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;

use round_rank_explorer::classifier::TypeGroups;
use round_rank_explorer::filter::{self, FilterOutcome, FilterRequest};
use round_rank_explorer::models::INSTITUTE_TYPE;
use round_rank_explorer::stats::{self, RankMeans};
use round_rank_explorer::{loader, partitioner, prepare_rounds, Config, RoundId, ValidationError};

fn cli() -> Command {
    Command::new("round-rank-explorer")
        .version("0.1")
        .about("Splits admission round tables per institute and filters them by closing rank")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(Arg::new("round").short('r').long("round").value_name("ROUND").help("Round to query, e.g. 'Round 2' or 2"))
        .arg(Arg::new("rank").short('k').long("rank").value_name("RANK").help("Show seats closing strictly above this rank"))
        .arg(Arg::new("type").short('t').long("type").value_name("TYPE").help("Institute type: IIT, IIIT, NIT or GFTI"))
        .arg(Arg::new("institute").long("institute").value_name("NAME"))
        .arg(Arg::new("quota").long("quota").value_name("QUOTA"))
        .arg(Arg::new("seat-type").long("seat-type").value_name("SEAT_TYPE"))
        .arg(Arg::new("gender").long("gender").value_name("GENDER"))
        .arg(
            Arg::new("sort-opening")
                .long("sort-opening")
                .action(ArgAction::SetTrue)
                .help("Order results by opening rank instead of institute"),
        )
        .arg(
            Arg::new("compare")
                .long("compare")
                .action(ArgAction::SetTrue)
                .help("Print average ranks per institute type for the results"),
        )
        .arg(
            Arg::new("no-export")
                .long("no-export")
                .action(ArgAction::SetTrue)
                .help("Skip writing per-institute CSV files"),
        )
}

fn main() -> Result<()> {
    env_logger::init();
    let matches = cli().get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        let default_config = Config::default();
        default_config.save_to_file(config_file)?;
        println!("⚠️  Adjust data_directory / file_pattern in {} if needed.", config_file);
        default_config
    };

    println!(
        "📂 Reading up to {} rounds from: {} ({})",
        config.round_count, config.data_directory, config.file_pattern
    );
    let report = loader::load_rounds(&config);
    for (round, e) in &report.failures {
        println!("   ❌ {}: {}", round, e);
    }
    let mut rounds = report.rounds;
    if rounds.is_empty() {
        println!("❌ No round files found in {}", config.data_directory);
        return Ok(());
    }
    for (round, table) in &rounds {
        println!("   ✅ {}: {} records", round, table.len());
    }

    if config.export_institutes && !matches.get_flag("no-export") {
        let output_dir = Path::new(&config.output_directory);
        let exported = partitioner::export_all(&rounds, output_dir);
        for (round, written) in &exported.written {
            println!("   📄 {}: {} institute files", round, written.len());
        }
        for (round, e) in &exported.failures {
            println!("   ❌ {}: export failed: {:#}", round, e);
        }
        println!("📂 Per-institute exports: {}", config.output_directory);
    }

    prepare_rounds(&mut rounds);

    let groups = TypeGroups::collect(&rounds);
    println!("\n📊 Records by institute type (all rounds):");
    for (kind, count) in groups.counts() {
        println!("   {:<5} {}", kind, count);
    }

    if matches.contains_id("round") || matches.contains_id("rank") {
        run_query(&matches, &rounds)?;
    }

    Ok(())
}

fn run_query(matches: &ArgMatches, rounds: &round_rank_explorer::RoundSet) -> Result<()> {
    let arg = |name: &str| matches.get_one::<String>(name).cloned();

    let round: RoundId = arg("round").ok_or(ValidationError::MissingRound)?.parse()?;
    let table = rounds
        .get(&round)
        .ok_or_else(|| ValidationError::UnknownRound(round.to_string()))?;

    let request = FilterRequest {
        institute_type: arg("type"),
        institute: arg("institute"),
        quota: arg("quota"),
        seat_type: arg("seat-type"),
        gender: arg("gender"),
        min_rank: arg("rank"),
    };
    let query = request.validate()?;

    println!("\n🔍 {}: seats closing above rank {}", round, query.min_rank);
    let mut results = match filter::apply(table, &query) {
        FilterOutcome::NoData => {
            println!("   ❓ No data found for the selected criteria.");
            return Ok(());
        }
        FilterOutcome::Matches(records) => records,
    };
    if matches.get_flag("sort-opening") {
        stats::sort_by_opening_rank(&mut results);
    }

    let mut columns = table.headers.clone();
    columns.push(INSTITUTE_TYPE.to_string());
    println!("{}", columns.join(" | "));
    for record in &results {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| record.cell(c).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!("\n✅ {} matching rows", results.len());

    if matches.get_flag("compare") {
        print_comparisons(&results);
    }
    Ok(())
}

fn print_comparisons(results: &[&round_rank_explorer::Record]) {
    fn print_group(title: &str, groups: &[RankMeans]) {
        let fmt = |v: Option<f64>| v.map(|m| format!("{:.1}", m)).unwrap_or_else(|| "n/a".to_string());
        println!("   {}:", title);
        for g in groups {
            println!(
                "      {:<40} opening {:>10}  closing {:>10}  ({} rows)",
                g.key,
                fmt(g.mean_opening),
                fmt(g.mean_closing),
                g.count
            );
        }
    }

    println!("\n📈 Average ranks");
    for comparison in stats::compare_by_type(results) {
        println!("Institute Type: {}", comparison.institute_type);
        print_group("By gender", &comparison.by_gender);
        print_group("By seat type", &comparison.by_seat_type);
        if let Some(by_quota) = &comparison.by_quota {
            print_group("By quota", by_quota);
        }
    }
}
