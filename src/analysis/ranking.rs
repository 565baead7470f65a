use crate::tournament::{AbilityStats, AggregateStats, LanguageStats};

/// Languages by win rate, best first. Ties fall back to battles fought, then id.
pub fn rank_languages(stats: &AggregateStats) -> Vec<(&str, &LanguageStats)> {
    let mut ranked: Vec<(&str, &LanguageStats)> = stats
        .language_performance
        .iter()
        .map(|(id, language)| (id.as_str(), language))
        .collect();

    ranked.sort_by(|(left_id, left), (right_id, right)| {
        right
            .win_rate
            .total_cmp(&left.win_rate)
            .then_with(|| right.total_battles.cmp(&left.total_battles))
            .then_with(|| left_id.cmp(right_id))
    });

    ranked
}

/// Abilities by win rate, best first. Ties fall back to average damage, then key.
pub fn rank_abilities(stats: &AggregateStats) -> Vec<(&str, &AbilityStats)> {
    let mut ranked: Vec<(&str, &AbilityStats)> = stats
        .ability_performance
        .iter()
        .map(|(key, ability)| (key.as_str(), ability))
        .collect();

    ranked.sort_by(|(left_key, left), (right_key, right)| {
        right
            .win_rate_with_ability
            .total_cmp(&left.win_rate_with_ability)
            .then_with(|| {
                right
                    .avg_damage_with_ability
                    .total_cmp(&left.avg_damage_with_ability)
            })
            .then_with(|| left_key.cmp(right_key))
    });

    ranked
}
