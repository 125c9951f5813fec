use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::QUARTERFINAL_SEEDS;
use crate::ratings::Ratings;
use crate::seeding::PlayoffField;
use crate::series::simulate_series;
use crate::team::{Conference, SeededTeam};
use crate::win_prob::EloParams;

/// Result of one full simulated postseason.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayoffOutcome<'a> {
    pub champion: &'a SeededTeam,
    pub east_champion: &'a SeededTeam,
    pub west_champion: &'a SeededTeam,
}

impl<'a> PlayoffOutcome<'a> {
    pub fn conference_champion(&self, conference: Conference) -> &'a SeededTeam {
        match conference {
            Conference::East => self.east_champion,
            Conference::West => self.west_champion,
        }
    }
}

/// Order two teams by current rating, best first.
///
/// An exact rating tie goes to the lower team id.
fn by_rating<'a>(a: &'a SeededTeam, b: &'a SeededTeam, ratings: &Ratings) -> (&'a SeededTeam, &'a SeededTeam) {
    let (ra, rb) = (ratings.get(a.team_id), ratings.get(b.team_id));
    if ra > rb || (ra == rb && a.team_id < b.team_id) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Decide which of two series winners holds home court in their next series.
///
/// The better (numerically lower) seed gets home court. Equal seeds fall back
/// to current rating, then team id.
///
/// # Returns
/// `(higher, lower)` ready to pass to [`simulate_series`]
pub fn resolve_home_court<'a>(
    a: &'a SeededTeam,
    b: &'a SeededTeam,
    ratings: &Ratings,
) -> (&'a SeededTeam, &'a SeededTeam) {
    match a.seed.cmp(&b.seed) {
        std::cmp::Ordering::Less => (a, b),
        std::cmp::Ordering::Greater => (b, a),
        std::cmp::Ordering::Equal => by_rating(a, b, ratings),
    }
}

/// Field plus rating-model constants: everything needed to play out brackets.
#[derive(Clone, Debug)]
pub struct PlayoffSimulator {
    pub field: PlayoffField,
    pub params: EloParams,
}

impl PlayoffSimulator {
    pub fn new(field: PlayoffField, params: EloParams) -> Self {
        PlayoffSimulator { field, params }
    }

    /// Play a series between two earlier-round winners, resolving home court first.
    fn play_winners<'a, R: Rng>(
        &self,
        a: &'a SeededTeam,
        b: &'a SeededTeam,
        ratings: &mut Ratings,
        rng: &mut R,
    ) -> &'a SeededTeam {
        let (higher, lower) = resolve_home_court(a, b, ratings);
        simulate_series(higher, lower, ratings, rng, &self.params).winner
    }

    /// Play out one conference bracket and return its champion.
    pub fn simulate_conference<R: Rng>(
        &self,
        conference: Conference,
        ratings: &mut Ratings,
        rng: &mut R,
    ) -> &SeededTeam {
        let teams = self.field.conference(conference);
        let seed = move |s: u8| &teams[usize::from(s) - 1];

        let quarterfinals: Vec<&SeededTeam> = QUARTERFINAL_SEEDS
            .iter()
            .map(|&(high, low)| simulate_series(seed(high), seed(low), ratings, rng, &self.params).winner)
            .collect();

        let semi1 = self.play_winners(quarterfinals[0], quarterfinals[1], ratings, rng);
        let semi2 = self.play_winners(quarterfinals[2], quarterfinals[3], ratings, rng);
        self.play_winners(semi1, semi2, ratings, rng)
    }

    /// Simulate one full postseason on `ratings`.
    ///
    /// East is played before West, then the championship. Every series
    /// updates the same rating map, so later rounds see the drift of earlier
    /// ones. The championship gives home court to the higher-rated conference
    /// champion since the two sides share no seed scale.
    pub fn simulate_once<R: Rng>(&self, ratings: &mut Ratings, rng: &mut R) -> PlayoffOutcome<'_> {
        let east_champion = self.simulate_conference(Conference::East, ratings, rng);
        let west_champion = self.simulate_conference(Conference::West, ratings, rng);

        let (higher, lower) = by_rating(east_champion, west_champion, ratings);
        let champion = simulate_series(higher, lower, ratings, rng, &self.params).winner;

        PlayoffOutcome {
            champion,
            east_champion,
            west_champion,
        }
    }

    /// Simulate one postseason from a fresh copy of `base`, seeded by `seed`.
    ///
    /// `base` is never modified.
    pub fn simulate_seeded(&self, base: &Ratings, seed: u64) -> PlayoffOutcome<'_> {
        let mut ratings = base.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.simulate_once(&mut ratings, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamId;

    fn make_field() -> PlayoffField {
        let east = (1..=8)
            .map(|s| SeededTeam::new(100 + s as TeamId, format!("East {}", s), Conference::East, s))
            .collect();
        let west = (1..=8)
            .map(|s| SeededTeam::new(200 + s as TeamId, format!("West {}", s), Conference::West, s))
            .collect();
        PlayoffField::new(east, west).unwrap()
    }

    #[test]
    fn test_resolve_home_court_by_seed() {
        let a = SeededTeam::new(1, "A", Conference::East, 4);
        let b = SeededTeam::new(2, "B", Conference::East, 1);
        let ratings: Ratings = [(1, 1700.0), (2, 1400.0)].into_iter().collect();

        let (higher, lower) = resolve_home_court(&a, &b, &ratings);
        assert_eq!((higher.team_id, lower.team_id), (2, 1), "Better seed beats better rating");
    }

    #[test]
    fn test_resolve_home_court_equal_seeds_by_rating() {
        let a = SeededTeam::new(1, "A", Conference::East, 1);
        let b = SeededTeam::new(2, "B", Conference::West, 1);
        let ratings: Ratings = [(1, 1500.0), (2, 1510.0)].into_iter().collect();

        let (higher, _) = resolve_home_court(&a, &b, &ratings);
        assert_eq!(higher.team_id, 2);

        let tied: Ratings = [(1, 1500.0), (2, 1500.0)].into_iter().collect();
        let (higher, _) = resolve_home_court(&b, &a, &tied);
        assert_eq!(higher.team_id, 1, "Exact rating tie goes to the lower team id");
    }

    #[test]
    fn test_outcome_teams_come_from_their_conference() {
        let sim = PlayoffSimulator::new(make_field(), EloParams::default());
        let base = Ratings::new();

        for seed in 0..200 {
            let outcome = sim.simulate_seeded(&base, seed);
            assert_eq!(outcome.east_champion.conference, Conference::East);
            assert_eq!(outcome.west_champion.conference, Conference::West);
            assert!(
                outcome.champion == outcome.east_champion || outcome.champion == outcome.west_champion,
                "Champion must be one of the finalists"
            );
        }
    }

    #[test]
    fn test_simulate_seeded_leaves_base_untouched() {
        let sim = PlayoffSimulator::new(make_field(), EloParams::default());
        let base: Ratings = sim.field.teams().map(|t| (t.team_id, 1500.0 + t.seed as f64)).collect();
        let snapshot = base.clone();

        let first = sim.simulate_seeded(&base, 99);
        let second = sim.simulate_seeded(&base, 99);
        assert_eq!(base, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bracket_conserves_total_rating() {
        let sim = PlayoffSimulator::new(make_field(), EloParams::default());
        let mut ratings: Ratings = sim.field.teams().map(|t| (t.team_id, 1600.0 - 10.0 * t.seed as f64)).collect();
        let before: f64 = ratings.iter().map(|(_, r)| r).sum();

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        sim.simulate_once(&mut ratings, &mut rng);

        let after: f64 = ratings.iter().map(|(_, r)| r).sum();
        assert!((before - after).abs() < 1e-6);
        assert_eq!(ratings.len(), 16);
    }

    #[test]
    fn test_dominant_seed_usually_wins_conference() {
        let sim = PlayoffSimulator::new(make_field(), EloParams::default());
        let mut base = Ratings::new();
        base.set(101, 2100.0);

        let wins = (0..300)
            .filter(|&seed| sim.simulate_seeded(&base, seed).east_champion.team_id == 101)
            .count();
        assert!(wins > 270, "Dominant top seed won East only {} of 300 times", wins);
    }
}
