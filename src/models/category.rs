use serde::{Deserialize, Serialize};

/// Fixed topical buckets used to group recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Learning,
    Creativity,
    Science,
    Stories,
    Physical,
    Languages,
    Math,
    Life,
}

impl Category {
    /// Canonical order; also the tie-break order when ranking categories
    pub const ALL: [Category; 8] = [
        Category::Learning,
        Category::Creativity,
        Category::Science,
        Category::Stories,
        Category::Physical,
        Category::Languages,
        Category::Math,
        Category::Life,
    ];
}

/// Occurrence count per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub learning: u32,
    pub creativity: u32,
    pub science: u32,
    pub stories: u32,
    pub physical: u32,
    pub languages: u32,
    pub math: u32,
    pub life: u32,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Learning => self.learning,
            Category::Creativity => self.creativity,
            Category::Science => self.science,
            Category::Stories => self.stories,
            Category::Physical => self.physical,
            Category::Languages => self.languages,
            Category::Math => self.math,
            Category::Life => self.life,
        }
    }

    pub fn increment(&mut self, category: Category) {
        let slot = match category {
            Category::Learning => &mut self.learning,
            Category::Creativity => &mut self.creativity,
            Category::Science => &mut self.science,
            Category::Stories => &mut self.stories,
            Category::Physical => &mut self.physical,
            Category::Languages => &mut self.languages,
            Category::Math => &mut self.math,
            Category::Life => &mut self.life,
        };
        *slot += 1;
    }

    /// Scores in canonical category order
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Categories with a positive score, highest first, ties in canonical order
    pub fn ranked(&self) -> Vec<Category> {
        let mut scored: Vec<(Category, u32)> = self.iter().filter(|(_, s)| *s > 0).collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(c, _)| c).collect()
    }
}

/// Category preferences once enough history exists to personalize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedCategories {
    pub scores: CategoryScores,
    pub top_categories: Vec<Category>,
    pub has_enough_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_is_stable_on_ties() {
        let scores = CategoryScores {
            math: 2,
            science: 2,
            learning: 5,
            ..Default::default()
        };

        assert_eq!(
            scores.ranked(),
            vec![Category::Learning, Category::Science, Category::Math]
        );
    }

    #[test]
    fn test_serializes_as_map() {
        let mut scores = CategoryScores::default();
        scores.increment(Category::Life);

        let value = serde_json::to_value(scores).unwrap();
        assert_eq!(value["life"], 1);
        assert_eq!(value["learning"], 0);
        assert_eq!(value.as_object().unwrap().len(), 8);
    }
}
