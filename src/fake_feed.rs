use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Entry, EntryId, Player};

const ENTRY_NAMES: &[&str] = &[
    "Gridiron Gurus",
    "Blitz Brigade",
    "Fourth and Long",
    "Hail Mary Heroes",
    "Red Zone Regulars",
    "Pick Six Posse",
    "Two Minute Drill",
    "Sunday Scaries",
    "End Zone Elite",
    "Audible Anarchy",
    "Frozen Tundra",
    "Wildcard Wanderers",
];

// Name pools per roster slot. Names repeat across entries so the stats view has
// duplicates to collapse.
const QBS: &[&str] = &["J. Allen", "P. Mahomes", "L. Jackson", "J. Hurts", "C. Stroud"];
const RBS: &[&str] = &[
    "C. McCaffrey",
    "D. Henry",
    "S. Barkley",
    "J. Gibbs",
    "K. Williams",
    "J. Cook",
];
const WRS: &[&str] = &[
    "J. Jefferson",
    "C. Lamb",
    "A. St. Brown",
    "T. Hill",
    "P. Nacua",
    "N. Collins",
    "M. Evans",
];
const TES: &[&str] = &["T. Kelce", "S. LaPorta", "G. Kittle", "M. Andrews"];
const KS: &[&str] = &["J. Tucker", "H. Butker", "J. Elliott", "C. Boswell"];
const DEFENSES: &[&str] = &["Ravens", "49ers", "Bills", "Lions", "Chiefs"];
const COACHES: &[&str] = &["A. Reid", "K. Shanahan", "D. Campbell", "S. McDermott"];

/// Builds a synthetic leaderboard with the same shape the live feed sends.
pub fn demo_entries<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Entry> {
    (0..count)
        .map(|idx| {
            let name = match ENTRY_NAMES.get(idx) {
                Some(name) => (*name).to_string(),
                None => format!("Entry {}", idx + 1),
            };
            let roster = demo_roster(rng);
            let total_points = roster
                .iter()
                .map(|p| p.points.unwrap_or(0.0) + p.bonus_points.unwrap_or(0.0))
                .sum::<f64>();
            let players_remaining = roster.iter().filter(|p| p.is_active).count() as u32;
            Entry {
                id: EntryId(format!("{}", idx + 1)),
                name,
                total_points: round1(total_points),
                players_remaining,
                roster: Some(roster),
            }
        })
        .collect()
}

fn demo_roster<R: Rng + ?Sized>(rng: &mut R) -> Vec<Player> {
    let mut roster = Vec::with_capacity(10);
    let qb = pick(rng, QBS);
    roster.push(offense(rng, qb, "QB"));
    for (slot, name) in pick_distinct(rng, RBS, 2).into_iter().enumerate() {
        roster.push(offense(rng, name, &format!("RB{}", slot + 1)));
    }
    for (slot, name) in pick_distinct(rng, WRS, 3).into_iter().enumerate() {
        roster.push(offense(rng, name, &format!("WR{}", slot + 1)));
    }
    let te = pick(rng, TES);
    roster.push(offense(rng, te, "TE"));
    let k = pick(rng, KS);
    roster.push(kicker(rng, k));
    let dst = pick(rng, DEFENSES);
    roster.push(defense(rng, dst));
    let head_coach = pick(rng, COACHES);
    roster.push(coach(rng, head_coach));
    roster
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or("Unknown")
}

fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str], n: usize) -> Vec<&'static str> {
    pool.choose_multiple(rng, n).copied().collect()
}

fn offense<R: Rng + ?Sized>(rng: &mut R, name: &str, position: &str) -> Player {
    let base = position.trim_end_matches(|c: char| c.is_ascii_digit());
    let (pass_yds, pass_td) = if base == "QB" {
        (rng.gen_range(150.0..400.0), rng.gen_range(0..5) as f64)
    } else {
        (0.0, 0.0)
    };
    let (rush_yds, rush_td) = match base {
        "QB" => (rng.gen_range(0.0..60.0), rng.gen_range(0..2) as f64),
        "RB" => (rng.gen_range(20.0..150.0), rng.gen_range(0..3) as f64),
        _ => (rng.gen_range(0.0..10.0), 0.0),
    };
    let (rec_yds, rec_td) = match base {
        "QB" => (0.0, 0.0),
        "RB" => (rng.gen_range(0.0..50.0), rng.gen_range(0..2) as f64),
        _ => (rng.gen_range(10.0..160.0), rng.gen_range(0..3) as f64),
    };
    let points = pass_yds / 25.0
        + pass_td * 4.0
        + rush_yds / 10.0
        + rush_td * 6.0
        + rec_yds / 10.0
        + rec_td * 6.0;
    Player {
        name: name.to_string(),
        position: position.to_string(),
        points: Some(round1(points)),
        bonus_points: bonus(rng),
        is_active: rng.gen_bool(0.6),
        pass_td: Some(pass_td),
        pass_yds: Some(round1(pass_yds)),
        rush_td: Some(rush_td),
        rush_yds: Some(round1(rush_yds)),
        rec_td: Some(rec_td),
        rec_yds: Some(round1(rec_yds)),
        ..Player::default()
    }
}

fn kicker<R: Rng + ?Sized>(rng: &mut R, name: &str) -> Player {
    Player {
        name: name.to_string(),
        position: "K".to_string(),
        points: Some(rng.gen_range(2..18) as f64),
        bonus_points: bonus(rng),
        is_active: rng.gen_bool(0.6),
        ..Player::default()
    }
}

fn defense<R: Rng + ?Sized>(rng: &mut R, name: &str) -> Player {
    let allowed = rng.gen_range(-4..10) as f64;
    let sacks = rng.gen_range(0..6) as f64;
    let ints = (rng.gen_range(0..3) * 2) as f64;
    let fumbles = (rng.gen_range(0..2) * 2) as f64;
    let safety = if rng.gen_bool(0.05) { 2.0 } else { 0.0 };
    Player {
        name: name.to_string(),
        position: "DEFENSE".to_string(),
        points: Some(allowed + sacks + ints + fumbles + safety),
        bonus_points: bonus(rng),
        is_active: rng.gen_bool(0.6),
        score_allowed_points: Some(allowed),
        score_sack_points: Some(sacks),
        score_interception_points: Some(ints),
        score_fumble_points: Some(fumbles),
        score_safety_points: Some(safety),
        ..Player::default()
    }
}

fn coach<R: Rng + ?Sized>(rng: &mut R, name: &str) -> Player {
    Player {
        name: name.to_string(),
        position: "COACH".to_string(),
        points: Some(if rng.gen_bool(0.5) { 5.0 } else { 0.0 }),
        bonus_points: None,
        is_active: rng.gen_bool(0.6),
        ..Player::default()
    }
}

fn bonus<R: Rng + ?Sized>(rng: &mut R) -> Option<f64> {
    if rng.gen_bool(0.3) {
        Some(round1(rng.gen_range(1.0..10.0)))
    } else {
        None
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
