use crate::models::{InstituteType, Record, RoundId, RoundSet, RoundTable};

// Checked in order, first hit wins.
const NAME_RULES: [(&str, InstituteType); 3] = [
    ("indianinstituteoftechnology", InstituteType::Iit),
    ("indianinstituteofinformationtechnology", InstituteType::Iiit),
    ("nationalinstituteoftechnology", InstituteType::Nit),
];

// Standalone abbreviations, consulted only when no spelled-out name matched.
const ABBREVIATION_RULES: [(&str, InstituteType); 3] = [
    ("IIT", InstituteType::Iit),
    ("IIIT", InstituteType::Iiit),
    ("NIT", InstituteType::Nit),
];

/// Derive the institute type from its name. Anything unmatched is a GFTI.
///
/// The name is lowercased and stripped of spaces, then tested against the
/// spelled-out names in priority order. Failing that, an exact uppercase
/// abbreviation word (`IIT Bombay`, `NIT-Trichy`) decides.
pub fn classify_name(name: &str) -> InstituteType {
    let compact: String = name.to_lowercase().chars().filter(|c| *c != ' ').collect();
    if let Some((_, kind)) = NAME_RULES
        .iter()
        .find(|(pattern, _)| compact.contains(pattern))
    {
        return *kind;
    }

    ABBREVIATION_RULES
        .iter()
        .find(|(abbreviation, _)| {
            name.split(|c: char| !c.is_alphanumeric())
                .any(|word| word == *abbreviation)
        })
        .map(|(_, kind)| *kind)
        .unwrap_or(InstituteType::Gfti)
}

pub fn classify_record(record: &Record) -> InstituteType {
    classify_name(&record.institute)
}

/// Tag every record of the table with its institute type.
pub fn classify(table: &mut RoundTable) {
    for record in &mut table.records {
        record.institute_type = Some(classify_record(record));
    }
}

pub fn classify_all(rounds: &mut RoundSet) {
    for table in rounds.values_mut() {
        classify(table);
    }
}

/// Cross-round records bucketed by institute type, each tagged with its round.
#[derive(Debug, Clone, Default)]
pub struct TypeGroups {
    pub iit: Vec<(RoundId, Record)>,
    pub iiit: Vec<(RoundId, Record)>,
    pub nit: Vec<(RoundId, Record)>,
    pub gfti: Vec<(RoundId, Record)>,
}

impl TypeGroups {
    /// One pass over the rounds in round order. Unclassified records are classified on the fly.
    pub fn collect(rounds: &RoundSet) -> Self {
        let mut groups = TypeGroups::default();
        for (round, table) in rounds {
            for record in &table.records {
                let kind = record
                    .institute_type
                    .unwrap_or_else(|| classify_record(record));
                let mut tagged = record.clone();
                tagged.institute_type = Some(kind);
                groups.bucket_mut(kind).push((*round, tagged));
            }
        }
        groups
    }

    pub fn get(&self, kind: InstituteType) -> &[(RoundId, Record)] {
        match kind {
            InstituteType::Iit => &self.iit,
            InstituteType::Iiit => &self.iiit,
            InstituteType::Nit => &self.nit,
            InstituteType::Gfti => &self.gfti,
        }
    }

    fn bucket_mut(&mut self, kind: InstituteType) -> &mut Vec<(RoundId, Record)> {
        match kind {
            InstituteType::Iit => &mut self.iit,
            InstituteType::Iiit => &mut self.iiit,
            InstituteType::Nit => &mut self.nit,
            InstituteType::Gfti => &mut self.gfti,
        }
    }

    pub fn counts(&self) -> Vec<(InstituteType, usize)> {
        InstituteType::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind).len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.iit.len() + self.iiit.len() + self.nit.len() + self.gfti.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{record, table};

    #[test]
    fn classifies_by_compacted_lowercase_name() {
        assert_eq!(
            classify_name("Indian Institute  of Technology Bombay"),
            InstituteType::Iit
        );
        assert_eq!(
            classify_name("Indian Institute of Information Technology, Allahabad"),
            InstituteType::Iiit
        );
        assert_eq!(
            classify_name("National Institute of Technology, Tiruchirappalli"),
            InstituteType::Nit
        );
        assert_eq!(
            classify_name("Birla Institute of Technology, Mesra, Ranchi"),
            InstituteType::Gfti
        );
        assert_eq!(classify_name(""), InstituteType::Gfti);
    }

    #[test]
    fn standalone_abbreviations_are_recognised() {
        assert_eq!(classify_name("IIT Bombay"), InstituteType::Iit);
        assert_eq!(classify_name("NIT-Trichy"), InstituteType::Nit);
        assert_eq!(classify_name("IIIT Hyderabad"), InstituteType::Iiit);
        // Abbreviations embedded in longer words do not count.
        assert_eq!(classify_name("IIITDM Kurnool"), InstituteType::Gfti);
        assert_eq!(classify_name("Unit of Engineering"), InstituteType::Gfti);
    }

    #[test]
    fn spelled_out_name_beats_abbreviation() {
        assert_eq!(
            classify_name("National Institute of Technology (formerly IIT annex)"),
            InstituteType::Nit
        );
    }

    #[test]
    fn first_rule_wins_when_several_match() {
        let name = "Indian Institute of Technology and National Institute of Technology Joint Campus";
        assert_eq!(classify_name(name), InstituteType::Iit);
    }

    #[test]
    fn classification_is_deterministic() {
        let names = [
            "Indian Institute of Technology Delhi",
            "National Institute of Technology Karnataka, Surathkal",
            "Indian Institute of Information Technology (IIIT) Pune",
            "Gurukula Kangri Vishwavidyalaya, Haridwar",
        ];
        for name in names {
            assert_eq!(classify_name(name), classify_name(name));
        }
    }

    #[test]
    fn collect_keeps_round_provenance() {
        let mut rounds = RoundSet::new();
        rounds.insert(
            RoundId(1),
            table(
                1,
                vec![
                    record("Indian Institute of Technology Bombay", "AI", "OPEN", "Gender-Neutral", "1", "66"),
                    record("National Institute of Technology Calicut", "HS", "OPEN", "Gender-Neutral", "900", "3000"),
                ],
            ),
        );
        let mut second = table(
            2,
            vec![record("Indian Institute of Technology Bombay", "AI", "OPEN", "Gender-Neutral", "1", "68")],
        );
        classify(&mut second);
        rounds.insert(RoundId(2), second);

        let groups = TypeGroups::collect(&rounds);
        assert_eq!(groups.iit.len(), 2);
        assert_eq!(groups.iit[0].0, RoundId(1));
        assert_eq!(groups.iit[1].0, RoundId(2));
        assert_eq!(groups.nit.len(), 1);
        assert!(groups.iiit.is_empty());
        assert_eq!(groups.total(), 3);
        assert!(groups
            .iit
            .iter()
            .all(|(_, r)| r.institute_type == Some(InstituteType::Iit)));
    }
}
