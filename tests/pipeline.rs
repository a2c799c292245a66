use std::fs;
use std::path::Path;

use round_rank_explorer::classifier::TypeGroups;
use round_rank_explorer::filter::{self, FilterOutcome, FilterQuery, FilterRequest};
use round_rank_explorer::{
    loader, partitioner, prepare_rounds, Config, InstituteType, RoundId, ValidationError,
};

const HEADER: &str = "Institute ,Quota,Seat Type, Gender,Opening Rank,Closing Rank\n";

fn write_round(dir: &Path, round: u32, rows: &[&str]) {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(dir.join(format!("2024_Round_{}.csv", round)), text).unwrap();
}

fn config_for(dir: &Path) -> Config {
    Config {
        data_directory: dir.to_string_lossy().into_owned(),
        output_directory: dir.join("institutes_csv").to_string_lossy().into_owned(),
        ..Config::default()
    }
}

#[test]
fn round_one_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_round(
        dir.path(),
        1,
        &["IIT Bombay,OPEN,SEAT,Male,10,50", "NIT Trichy,HS,GEN,Female,5,30"],
    );

    let mut rounds = loader::load_rounds(&config_for(dir.path())).rounds;
    prepare_rounds(&mut rounds);

    let round1 = &rounds[&RoundId(1)];
    let types: Vec<_> = round1.records.iter().map(|r| r.institute_type).collect();
    assert_eq!(types, vec![Some(InstituteType::Iit), Some(InstituteType::Nit)]);

    match filter::apply(round1, &FilterQuery::new(20)) {
        FilterOutcome::Matches(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].institute, "IIT Bombay");
        }
        FilterOutcome::NoData => panic!("expected IIT Bombay to match"),
    }
}

#[test]
fn only_present_rounds_are_loaded_and_exported() {
    let dir = tempfile::tempdir().unwrap();
    write_round(
        dir.path(),
        2,
        &[
            "Indian Institute of Technology Madras,AI,OPEN,Gender-Neutral,1,150",
            "National Institute of Technology Karnataka Surathkal,OS,OPEN,Gender-Neutral,900,N/A",
            "Indian Institute of Technology Madras,AI,EWS,Female-only,200,310",
        ],
    );
    write_round(dir.path(), 4, &["Birla Institute of Technology Mesra,AI,OPEN,Gender-Neutral,5000,9000"]);
    fs::write(dir.path().join("2024_Round_5.csv"), "Institute,Quota\n\"unterminated\n").unwrap();

    let config = config_for(dir.path());
    let report = loader::load_rounds(&config);
    assert_eq!(
        report.rounds.keys().copied().collect::<Vec<_>>(),
        vec![RoundId(2), RoundId(4)]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, RoundId(5));

    let output_dir = Path::new(&config.output_directory);
    for table in report.rounds.values() {
        partitioner::export_round(table, output_dir).unwrap();
    }

    let madras = output_dir
        .join("Round 2")
        .join("Indian_Institute_of_Technology_Madras.csv");
    assert_eq!(
        fs::read_to_string(madras).unwrap(),
        "Quota,Seat Type,Gender,Opening Rank,Closing Rank\n\
         AI,OPEN,Gender-Neutral,1,150\n\
         AI,EWS,Female-only,200,310\n"
    );
    assert!(output_dir
        .join("Round 4")
        .join("Birla_Institute_of_Technology_Mesra.csv")
        .exists());
    assert!(!output_dir.join("Round 5").exists());
}

#[test]
fn type_groups_and_filters_after_preparation() {
    let dir = tempfile::tempdir().unwrap();
    write_round(
        dir.path(),
        1,
        &[
            "National Institute of Technology Calicut,HS,OPEN,Gender-Neutral,900,3000",
            "Indian Institute of Information Technology Allahabad,AI,OPEN,Gender-Neutral,4000,7000",
            "Assam University Silchar,OS,OPEN,Gender-Neutral,20000,N/A",
        ],
    );
    write_round(
        dir.path(),
        3,
        &["National Institute of Technology Calicut,HS,OPEN,Gender-Neutral,950,3100"],
    );

    let mut rounds = loader::load_rounds(&config_for(dir.path())).rounds;
    prepare_rounds(&mut rounds);

    let groups = TypeGroups::collect(&rounds);
    assert_eq!(
        groups.nit.iter().map(|(round, _)| *round).collect::<Vec<_>>(),
        vec![RoundId(1), RoundId(3)]
    );
    assert_eq!(groups.iiit.len(), 1);
    assert_eq!(groups.gfti.len(), 1);
    assert!(groups.iit.is_empty());

    let round1 = &rounds[&RoundId(1)];
    let outcome = filter::apply(round1, &FilterQuery::new(0));
    let names: Vec<_> = outcome.records().iter().map(|r| r.institute.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Indian Institute of Information Technology Allahabad",
            "National Institute of Technology Calicut"
        ]
    );

    let request = FilterRequest {
        institute_type: Some("GFTI".into()),
        min_rank: Some("0".into()),
        ..FilterRequest::default()
    };
    assert!(filter::apply(round1, &request.validate().unwrap()).is_empty());

    let bad = FilterRequest {
        min_rank: Some("twenty".into()),
        ..FilterRequest::default()
    };
    assert_eq!(
        bad.validate().unwrap_err(),
        ValidationError::InvalidRank("twenty".into())
    );
}
