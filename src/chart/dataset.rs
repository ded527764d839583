use crate::data::TeamRecord;

/// One labeled value in a derived chart dataset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Datum {
    pub label: &'static str,
    pub value: f64,
}

impl Datum {
    fn new(label: &'static str, value: f64) -> Self {
        Self { label, value }
    }
}

/// Pie dataset for a selected team: win/draw/loss split of matches
/// played. Unknown team names yield an empty dataset. Duplicate team
/// names resolve to the first record (linear scan, first match wins).
pub fn pie_dataset(teams: &[TeamRecord], team: &str) -> Vec<Datum> {
    let Some(record) = teams.iter().find(|r| r.team == team) else {
        return Vec::new();
    };
    vec![
        Datum::new("Wins", record.win as f64),
        Datum::new("Draws", record.draw as f64),
        Datum::new("Losses", record.loss as f64),
    ]
}

/// Bar dataset for a selected team: six fixed metrics in fixed order.
pub fn bar_dataset(teams: &[TeamRecord], team: &str) -> Vec<Datum> {
    let Some(record) = teams.iter().find(|r| r.team == team) else {
        return Vec::new();
    };
    vec![
        Datum::new("Participations", record.participations as f64),
        Datum::new("Matches", record.played as f64),
        Datum::new("Points", record.points as f64),
        Datum::new("Points/match", record.points_per_match),
        Datum::new("Scored", record.goal_for as f64),
        Datum::new("Conceded", record.goal_against as f64),
    ]
}

/// Explicit reconciliation of a displayed dataset against a new one,
/// keyed by label: `added` is in the new set only, `removed` in the old
/// set only, `updated` pairs (old, new) for labels present in both.
/// `added` and `updated` follow the new dataset's order.
#[derive(Debug, Default)]
pub struct ChartDiff {
    pub added: Vec<Datum>,
    pub updated: Vec<(Datum, Datum)>,
    pub removed: Vec<Datum>,
}

pub fn diff_by_label(current: &[Datum], next: &[Datum]) -> ChartDiff {
    let mut diff = ChartDiff::default();

    for datum in next {
        match current.iter().find(|d| d.label == datum.label) {
            Some(old) => diff.updated.push((*old, *datum)),
            None => diff.added.push(*datum),
        }
    }
    for datum in current {
        if !next.iter().any(|d| d.label == datum.label) {
            diff.removed.push(*datum);
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(team: &str, win: u32, draw: u32, loss: u32) -> TeamRecord {
        TeamRecord {
            country: team.to_string(),
            team: team.to_string(),
            participations: 9,
            played: win + draw + loss,
            win,
            draw,
            loss,
            goal_for: 40,
            goal_against: 20,
            points: win * 3 + draw,
            points_per_match: (win * 3 + draw) as f64 / (win + draw + loss) as f64,
        }
    }

    fn france() -> TeamRecord {
        TeamRecord {
            country: "France".to_string(),
            team: "France".to_string(),
            participations: 9,
            played: 18,
            win: 10,
            draw: 5,
            loss: 3,
            goal_for: 40,
            goal_against: 20,
            points: 35,
            points_per_match: 1.9,
        }
    }

    #[test]
    fn test_pie_sums_to_matches_played() {
        let teams = vec![record("Italy", 12, 8, 4), record("Spain", 17, 9, 6), france()];
        for team in &teams {
            let pie = pie_dataset(&teams, &team.team);
            assert_eq!(pie.len(), 3);
            let total: f64 = pie.iter().map(|d| d.value).sum();
            assert_eq!(total, team.played as f64);
        }
    }

    #[test]
    fn test_bar_metrics_fixed_order() {
        let teams = vec![france()];
        let bars = bar_dataset(&teams, "France");
        let labels: Vec<_> = bars.iter().map(|d| d.label).collect();
        assert_eq!(
            labels,
            ["Participations", "Matches", "Points", "Points/match", "Scored", "Conceded"]
        );
    }

    #[test]
    fn test_unknown_team_yields_empty_datasets() {
        let teams = vec![france()];
        assert!(pie_dataset(&teams, "Atlantis").is_empty());
        assert!(bar_dataset(&teams, "Atlantis").is_empty());
    }

    #[test]
    fn test_france_example_end_to_end() {
        let teams = vec![france()];

        let pie = pie_dataset(&teams, "France");
        assert_eq!(pie[0], Datum { label: "Wins", value: 10.0 });
        assert_eq!(pie[1], Datum { label: "Draws", value: 5.0 });
        assert_eq!(pie[2], Datum { label: "Losses", value: 3.0 });

        let bars = bar_dataset(&teams, "France");
        let values: Vec<f64> = bars.iter().map(|d| d.value).collect();
        assert_eq!(values, [9.0, 18.0, 35.0, 1.9, 40.0, 20.0]);
    }

    #[test]
    fn test_duplicate_team_first_match_wins() {
        let mut teams = vec![record("Italy", 12, 8, 4)];
        teams.push(record("Italy", 1, 1, 1));
        let pie = pie_dataset(&teams, "Italy");
        assert_eq!(pie[0].value, 12.0);
    }

    #[test]
    fn test_diff_same_dataset_is_all_update() {
        let teams = vec![france()];
        let bars = bar_dataset(&teams, "France");
        let diff = diff_by_label(&bars, &bars);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(diff.updated.len(), bars.len());
    }

    #[test]
    fn test_diff_against_empty() {
        let teams = vec![france()];
        let pie = pie_dataset(&teams, "France");

        let from_empty = diff_by_label(&[], &pie);
        assert_eq!(from_empty.added.len(), 3);
        assert!(from_empty.updated.is_empty());

        let to_empty = diff_by_label(&pie, &[]);
        assert_eq!(to_empty.removed.len(), 3);
        assert!(to_empty.added.is_empty());
    }

    #[test]
    fn test_diff_partitions_by_label() {
        let old = vec![Datum::new("Wins", 1.0), Datum::new("Draws", 2.0)];
        let new = vec![Datum::new("Draws", 4.0), Datum::new("Losses", 3.0)];
        let diff = diff_by_label(&old, &new);
        assert_eq!(diff.added, vec![Datum::new("Losses", 3.0)]);
        assert_eq!(diff.removed, vec![Datum::new("Wins", 1.0)]);
        assert_eq!(diff.updated, vec![(Datum::new("Draws", 2.0), Datum::new("Draws", 4.0))]);
    }
}
