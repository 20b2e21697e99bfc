use serde::Serialize;

/// One quiz question. The catalog is fixed at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub subtitle: &'static str,
    pub options: &'static [&'static str],
    pub multi_select: bool,
    /// Selection cap for multi-select questions; 1 for single-select.
    pub max_selections: usize,
}

impl Question {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.contains(&option)
    }
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: "skinType",
        prompt: "What is your skin type?",
        subtitle: "This helps us understand your basic skin needs.",
        options: &["Oily", "Dry", "Combination", "Sensitive", "Normal"],
        multi_select: false,
        max_selections: 1,
    },
    Question {
        id: "skinConcerns",
        prompt: "What are your main skin concerns?",
        subtitle: "Select up to 3. This helps us target your specific issues.",
        options: &[
            "Acne & Blemishes",
            "Redness & Rosacea",
            "Dark Spots & Hyperpigmentation",
            "Fine Lines & Wrinkles",
            "Enlarged Pores",
            "Dullness & Uneven Texture",
        ],
        multi_select: true,
        max_selections: 3,
    },
    Question {
        id: "makeupExperience",
        prompt: "How would you describe your makeup experience?",
        subtitle: "This helps us recommend products at the right level.",
        options: &["Beginner", "Intermediate", "Advanced", "Professional"],
        multi_select: false,
        max_selections: 1,
    },
    Question {
        id: "dailyRoutine",
        prompt: "How much time do you spend on your daily beauty routine?",
        subtitle: "We'll tailor recommendations to fit your schedule.",
        options: &["5-10 minutes", "15-30 minutes", "30-60 minutes", "Over 1 hour"],
        multi_select: false,
        max_selections: 1,
    },
    Question {
        id: "budget",
        prompt: "What is your preferred budget range for beauty products?",
        subtitle: "We'll find options that work within your budget.",
        options: &["Under $25", "$25-$50", "$50-$100", "Over $100"],
        multi_select: false,
        max_selections: 1,
    },
];
