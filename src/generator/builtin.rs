//! 内置生成器，用于给 URL 注入随机值以绕过被测站点的缓存

use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::generator::GeneratorRegistry;

const WORDS: &[&str] = &[
    "house", "river", "language", "window", "garden", "letter", "mountain", "music", "city",
    "paper", "winter", "bridge", "forest", "history", "market", "school", "stone", "summer",
    "table", "village", "water", "world", "corpus", "dictionary", "sentence",
];

pub fn random_word() -> String {
    WORDS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("word")
        .to_string()
}

/// 2-3 个随机单词，空格分隔
pub fn random_phrase() -> String {
    let mut rng = rand::rng();
    let count = rng.random_range(2..=3);
    (0..count)
        .filter_map(|_| WORDS.choose(&mut rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn random_int() -> String {
    rand::rng().random_range(0..1_000_000u32).to_string()
}

pub fn user_id() -> String {
    rand::rng().random_range(1..=100_000u32).to_string()
}

pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn timestamp() -> String {
    Utc::now().timestamp().to_string()
}

pub fn date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// 注册所有内置生成器
pub fn register_all(registry: &mut GeneratorRegistry) {
    registry.register("random_word", random_word);
    registry.register("random_phrase", random_phrase);
    registry.register("random_int", random_int);
    registry.register("uuid", uuid);
    registry.register("timestamp", timestamp);

    registry.register_in("words", "random_word", random_word);
    registry.register_in("words", "generate_phrase", random_phrase);
    registry.register_in("numbers", "random_int", random_int);
    registry.register_in("ids", "uuid", uuid);
    registry.register_in("ids", "user_id", user_id);
    registry.register_in("time", "timestamp", timestamp);
    registry.register_in("time", "date", date);
}
