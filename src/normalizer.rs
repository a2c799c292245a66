use crate::models::{Rank, RoundSet, RoundTable};

/// Coerce rank text to a number. Anything that is not a finite number becomes `Missing`.
pub fn parse_rank(text: &str) -> Rank {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Rank::Value(v),
        _ => Rank::Missing,
    }
}

fn normalize_rank(rank: &Rank) -> Rank {
    match rank {
        Rank::Raw(text) => parse_rank(text),
        settled => settled.clone(),
    }
}

/// Convert opening and closing ranks of every record in place. Safe to call repeatedly.
pub fn normalize(table: &mut RoundTable) {
    let mut missing = 0usize;
    for record in &mut table.records {
        record.opening_rank = normalize_rank(&record.opening_rank);
        record.closing_rank = normalize_rank(&record.closing_rank);
        if record.closing_rank == Rank::Missing {
            missing += 1;
        }
    }
    if missing > 0 {
        log::debug!("{}: {} records without a numeric closing rank", table.round, missing);
    }
}

pub fn normalize_all(rounds: &mut RoundSet) {
    for table in rounds.values_mut() {
        normalize(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{record, table};

    #[test]
    fn parses_numbers_and_degrades_everything_else() {
        assert_eq!(parse_rank("42"), Rank::Value(42.0));
        assert_eq!(parse_rank(" 7 "), Rank::Value(7.0));
        assert_eq!(parse_rank("12.5"), Rank::Value(12.5));
        assert_eq!(parse_rank("N/A"), Rank::Missing);
        assert_eq!(parse_rank(""), Rank::Missing);
        assert_eq!(parse_rank("1234P"), Rank::Missing);
        assert_eq!(parse_rank("nan"), Rank::Missing);
        assert_eq!(parse_rank("inf"), Rank::Missing);
    }

    #[test]
    fn normalize_leaves_no_raw_ranks() {
        let mut t = table(
            1,
            vec![
                record("IIT Bombay", "AI", "OPEN", "Gender-Neutral", "10", "50"),
                record("NIT Trichy", "HS", "OBC-NCL", "Female-only", "", "N/A"),
            ],
        );
        normalize(&mut t);

        assert_eq!(t.records[0].opening_rank, Rank::Value(10.0));
        assert_eq!(t.records[0].closing_rank, Rank::Value(50.0));
        assert_eq!(t.records[1].opening_rank, Rank::Missing);
        assert_eq!(t.records[1].closing_rank, Rank::Missing);
        assert!(t
            .records
            .iter()
            .all(|r| !matches!(r.opening_rank, Rank::Raw(_)) && !matches!(r.closing_rank, Rank::Raw(_))));
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut once = table(
            2,
            vec![
                record("IIIT Allahabad", "AI", "EWS", "Gender-Neutral", "300", "412"),
                record("Assam University", "OS", "SC", "Gender-Neutral", "abc", "9000"),
            ],
        );
        normalize(&mut once);
        let mut twice = once.clone();
        normalize(&mut twice);
        assert_eq!(once, twice);
    }
}
