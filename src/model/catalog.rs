use super::milestone::{Category, Milestone};

/// Fixed vocabulary of milestones offered to every new session.
const CATALOG: &[(&str, &str, Category, u32)] = &[
    // ── Communication ───────────────────────────────────────────
    ("cooing", "Cooing", Category::Communication, 2),
    ("babbling", "Babbling", Category::Communication, 6),
    ("responds_to_name", "Responds to name", Category::Communication, 9),
    ("pointing", "Pointing to request", Category::Communication, 12),
    ("first_words", "First words", Category::Communication, 12),
    ("follows_commands", "Follows simple commands", Category::Communication, 15),
    ("two_word_phrases", "Two-word phrases", Category::Communication, 24),
    ("sentences", "Short sentences", Category::Communication, 36),
    // ── Motor ───────────────────────────────────────────────────
    ("head_control", "Head control", Category::Motor, 3),
    ("rolling_over", "Rolling over", Category::Motor, 5),
    ("sitting", "Sitting unsupported", Category::Motor, 7),
    ("crawling", "Crawling", Category::Motor, 9),
    ("pulls_to_stand", "Pulls to stand", Category::Motor, 10),
    ("walking", "Walking independently", Category::Motor, 12),
    ("running", "Running", Category::Motor, 18),
    ("stairs", "Climbs stairs", Category::Motor, 24),
    ("toilet_trained", "Toilet trained", Category::Motor, 36),
    // ── Social ──────────────────────────────────────────────────
    ("social_smile", "Social smile", Category::Social, 2),
    ("eye_contact", "Sustained eye contact", Category::Social, 3),
    ("joint_attention", "Joint attention", Category::Social, 9),
    ("waves_bye", "Waves bye-bye", Category::Social, 10),
    ("pretend_play", "Pretend play", Category::Social, 18),
    ("parallel_play", "Parallel play", Category::Social, 24),
    ("cooperative_play", "Plays with peers", Category::Social, 36),
    // ── Concerns (not age-referenced) ───────────────────────────
    ("regression", "Loss of skills", Category::Concerns, 0),
    ("repetitive_behaviour", "Repetitive behaviour", Category::Concerns, 0),
    ("sensory_sensitivity", "Sensory sensitivities", Category::Concerns, 0),
    ("sleep_difficulties", "Sleep difficulties", Category::Concerns, 0),
    ("feeding_difficulties", "Feeding difficulties", Category::Concerns, 0),
];

/// Build the default, fully unplaced milestone list, ending with the
/// add-concern sentinel.
pub fn default_milestones() -> Vec<Milestone> {
    let mut milestones: Vec<Milestone> = CATALOG
        .iter()
        .map(|(id, title, category, expected)| Milestone::new(*id, *title, *category, *expected))
        .collect();
    milestones.push(Milestone::add_concern_sentinel());
    milestones
}
