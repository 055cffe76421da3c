use crate::models::{Category, CategoryScores, VideoRecord};

/// Seed keywords per category, Russian first, then English
fn seed_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Learning => &[
            "алфавит", "цифры", "буквы", "счет", "учим", "изучаем", "обучение",
            "alphabet", "numbers", "letters", "reading", "phonics",
        ],
        Category::Creativity => &[
            "рисование", "лепка", "поделки", "творчество", "рисуем", "мастер-класс",
            "drawing", "crafts", "music", "painting", "origami",
        ],
        Category::Science => &[
            "наука", "эксперимент", "природа", "животные", "космос", "почему",
            "science", "animals", "space", "dinosaurs", "nature",
        ],
        Category::Stories => &[
            "сказка", "история", "стих", "песня", "басня",
            "fairy", "tales", "stories", "lullaby", "nursery",
        ],
        Category::Physical => &[
            "зарядка", "танец", "физкультура", "гимнастика", "спорт", "игра",
            "exercise", "dance", "yoga", "sports", "fitness",
        ],
        Category::Languages => &[
            "английский", "испанский", "французский", "немецкий", "китайский",
            "english", "spanish", "french", "german", "chinese", "language",
        ],
        Category::Math => &[
            "сложение", "вычитание", "умножение", "геометрия", "математика",
            "addition", "subtraction", "multiplication", "geometry", "counting", "math",
        ],
        Category::Life => &[
            "готовка", "гигиена", "безопасность", "вежливость", "эмоции",
            "cooking", "hygiene", "safety", "manners", "emotions",
        ],
    }
}

/// Scores each category by seed-keyword substring hits across the videos.
///
/// Every matching seed word counts once per video, so one video can add
/// several points to one category and points to several categories.
pub fn score_categories<V: AsRef<VideoRecord>>(videos: &[V]) -> CategoryScores {
    let mut scores = CategoryScores::default();

    for video in videos {
        let text = video.as_ref().search_text();

        for category in Category::ALL {
            for keyword in seed_keywords(category) {
                if text.contains(keyword) {
                    scores.increment(category);
                }
            }
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, description: &str) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_scores_learning_and_creativity() {
        let scores = score_categories(&[
            video("Учим алфавит буквы", ""),
            video("Учим счет цифры", ""),
            video("Рисование для детей", "творчество"),
        ]);

        // учим + алфавит + буквы, then учим + счет + цифры
        assert_eq!(scores.learning, 6);
        assert_eq!(scores.creativity, 2);
        assert_eq!(scores.science, 0);
    }

    #[test]
    fn test_substring_matching_counts_each_seed_word() {
        let scores = score_categories(&[video("Counting numbers", "")]);
        assert_eq!(scores.math, 1);
        assert_eq!(scores.learning, 1);
    }

    #[test]
    fn test_one_video_can_hit_several_categories() {
        let scores = score_categories(&[video("Dinosaurs dance yoga", "english")]);
        assert_eq!(scores.science, 1);
        assert_eq!(scores.physical, 2);
        assert_eq!(scores.languages, 1);
    }

    #[test]
    fn test_no_videos() {
        assert_eq!(score_categories::<VideoRecord>(&[]), CategoryScores::default());
    }
}
