//! Built-in learning content: supported languages, lesson units, quiz banks.
//!
//! The tables are static; callers get borrowed views or owned [`Language`]
//! values for storing in settings.

use serde::Serialize;

use crate::store::models::Language;

// =============================================================================
// LANGUAGES
// =============================================================================

/// `(code, name, flag)`. The first entry is the default study language.
const LANGUAGES: [(&str, &str, &str); 5] = [
    ("en", "English", "🇺🇸"),
    ("hi", "Hindi", "🇮🇳"),
    ("es", "Spanish", "🇪🇸"),
    ("fr", "French", "🇫🇷"),
    ("de", "German", "🇩🇪"),
];

fn to_language((code, name, flag): (&str, &str, &str)) -> Language {
    Language { code: code.to_string(), name: name.to_string(), flag: flag.to_string() }
}

#[must_use]
pub fn languages() -> Vec<Language> {
    LANGUAGES.into_iter().map(to_language).collect()
}

#[must_use]
pub fn default_language() -> Language {
    to_language(LANGUAGES[0])
}

/// Look up a supported language by code (case-insensitive).
#[must_use]
pub fn language(code: &str) -> Option<Language> {
    let code = normalize_code(code);
    LANGUAGES.into_iter().find(|(c, _, _)| *c == code).map(to_language)
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

// =============================================================================
// CONTENT TYPES
// =============================================================================

/// Multiple-choice question. `correct_answer` indexes into `options`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'static str>,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: usize,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub content: &'static str,
    pub questions: &'static [Question],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LessonUnit {
    pub id: &'static str,
    pub title: &'static str,
    pub lessons: &'static [Lesson],
}

const fn q(
    question: &'static str,
    options: &'static [&'static str],
    correct_answer: usize,
    explanation: &'static str,
) -> Question {
    Question { id: None, question, options, correct_answer, explanation }
}

const fn quiz(
    id: &'static str,
    question: &'static str,
    options: &'static [&'static str],
    correct_answer: usize,
    explanation: &'static str,
) -> Question {
    Question { id: Some(id), question, options, correct_answer, explanation }
}

// =============================================================================
// LESSONS
// =============================================================================

const EN_UNITS: &[LessonUnit] = &[LessonUnit {
    id: "en_u1",
    title: "Unit 1: Foundations",
    lessons: &[
        Lesson {
            id: "en_l1",
            title: "Essential Greetings",
            description: "Formal and informal ways to say hello.",
            content: "In English, \"Hello\" is the universal greeting. Use \"Good morning\" before noon, \"Good afternoon\" until 5 PM, and \"Good evening\" after. \"Hi\" or \"Hey\" are great for friends!",
            questions: &[
                q("What is the most common informal greeting?", &["Good morning", "Hello", "Hi"], 2, "\"Hi\" is the standard informal greeting."),
                q("When is \"Good evening\" appropriate?", &["At 8 AM", "At 2 PM", "At 7 PM"], 2, "\"Evening\" refers to the period after the sun starts setting."),
            ],
        },
        Lesson {
            id: "en_l2",
            title: "The Verb \"To Be\"",
            description: "I am, You are, He is.",
            content: "The verb \"to be\" is the most important verb. \nI am (I'm)\nYou are (You're)\nHe/She/It is (He's/She's/It's)\nWe are (We're)\nThey are (They're)",
            questions: &[q("Complete the sentence: \"She ___ a doctor.\"", &["am", "is", "are"], 1, "Third person singular \"She\" takes \"is\".")],
        },
    ],
}];

const HI_UNITS: &[LessonUnit] = &[LessonUnit {
    id: "hi_u1",
    title: "Unit 1: The Basics",
    lessons: &[
        Lesson {
            id: "hi_l1",
            title: "Hindi Vowels (Swar)",
            description: "The building blocks of the language.",
            content: "Hindi uses the Devanagari script. The first few vowels are: \nअ (a) - as in \"up\"\nआ (aa) - as in \"car\"\nइ (i) - as in \"it\"\nई (ee) - as in \"feet\"",
            questions: &[q("Which character represents the long \"ee\" sound?", &["अ", "इ", "ई"], 2, "ई represents the long \"ee\" sound.")],
        },
        Lesson {
            id: "hi_l2",
            title: "Polite Greetings",
            description: "Namaste and more.",
            content: "\"Namaste\" (नमस्ते) is the most respectful way to greet anyone. You can also use \"Suprabhat\" (सुप्रभात) for \"Good Morning\". To say thank you, use \"Shukriya\" (शुक्रिया) or \"Dhanyavad\" (धन्यवाद).",
            questions: &[q("What is the formal word for \"Thank you\"?", &["Namaste", "Dhanyavad", "Suprabhat"], 1, "\"Dhanyavad\" is a formal Sanskrit-based word for \"Thank you\".")],
        },
    ],
}];

const ES_UNITS: &[LessonUnit] = &[LessonUnit {
    id: "es_u1",
    title: "Unidad 1: Empezando",
    lessons: &[
        Lesson {
            id: "es_l1",
            title: "Saludos y Despedidas",
            description: "Hello, goodbye, and more.",
            content: "Greetings: \"¡Hola!\" (Hello), \"Buenos días\" (Good morning), \"Buenas tardes\" (Good afternoon), \"Buenas noches\" (Good evening).\nFarewells: \"Adiós\" (Goodbye), \"Hasta luego\" (See you later).",
            questions: &[
                q("How do you say \"Good Afternoon\"?", &["Buenas noches", "Buenas tardes", "Buenos días"], 1, "\"Tardes\" refers to the afternoon."),
                q("What does \"Hasta luego\" mean?", &["Hello", "See you later", "Good night"], 1, "\"Hasta\" means until, \"luego\" means later."),
            ],
        },
        Lesson {
            id: "es_l2",
            title: "Personal Pronouns",
            description: "Yo, Tú, Él...",
            content: "Yo (I)\nTú (You - informal)\nUsted (You - formal)\nÉl/Ella (He/She)\nNosotros (We)\nEllos/Ellas (They)",
            questions: &[q("Which pronoun is used for \"We\"?", &["Ellos", "Nosotros", "Usted"], 1, "Nosotros is the plural \"We\".")],
        },
    ],
}];

const FR_UNITS: &[LessonUnit] = &[LessonUnit {
    id: "fr_u1",
    title: "Unité 1: Les Bases",
    lessons: &[
        Lesson {
            id: "fr_l1",
            title: "Salutations de base",
            description: "Greetings in French.",
            content: "\"Bonjour\" is the most common greeting. \"Salut\" is for friends. \"Comment ça va ?\" means \"How is it going?\". To answer, say \"Ça va bien, merci !\"",
            questions: &[q("What is the informal way to say \"Hi\"?", &["Bonjour", "Salut", "Merci"], 1, "\"Salut\" is used among friends and peers.")],
        },
        Lesson {
            id: "fr_l2",
            title: "Nouns & Genders",
            description: "Masculine vs Feminine.",
            content: "In French, all nouns have a gender. \nMasculine: Un livre (a book), Le garçon (the boy).\nFeminine: Une pomme (an apple), La fille (the girl).",
            questions: &[q("Which article is feminine singular?", &["Le", "Les", "La"], 2, "\"La\" is the definite feminine singular article.")],
        },
    ],
}];

const DE_UNITS: &[LessonUnit] = &[LessonUnit {
    id: "de_u1",
    title: "Einheit 1: Erste Schritte",
    lessons: &[
        Lesson {
            id: "de_l1",
            title: "Begrüßung",
            description: "German greetings.",
            content: "\"Hallo\" is universal. \"Guten Tag\" (Good day) is slightly more formal. In the South (Bavaria), people say \"Grüß Gott!\".",
            questions: &[q("What does \"Guten Tag\" mean?", &["Good morning", "Good day", "Goodbye"], 1, "\"Tag\" is the German word for day.")],
        },
        Lesson {
            id: "de_l2",
            title: "The Three Genders",
            description: "Der, Die, Das.",
            content: "German has three grammatical genders: \nDer (Masculine) - der Hund\nDie (Feminine) - die Katze\nDas (Neuter) - das Haus",
            questions: &[q("Which article is used for Neuter nouns?", &["Der", "Das", "Die"], 1, "\"Das\" is the neuter definite article.")],
        },
    ],
}];

/// Lesson units for a language code (case-insensitive); empty for unknown
/// codes.
#[must_use]
pub fn lesson_units(code: &str) -> &'static [LessonUnit] {
    match normalize_code(code).as_str() {
        "en" => EN_UNITS,
        "hi" => HI_UNITS,
        "es" => ES_UNITS,
        "fr" => FR_UNITS,
        "de" => DE_UNITS,
        _ => &[],
    }
}

#[must_use]
pub fn lesson(code: &str, lesson_id: &str) -> Option<&'static Lesson> {
    lesson_units(code)
        .iter()
        .flat_map(|unit| unit.lessons)
        .find(|lesson| lesson.id == lesson_id)
}

// =============================================================================
// QUIZ BANK
// =============================================================================

const EN_QUIZ: &[Question] = &[
    quiz("en1", "Which of these is a synonym for \"Enthusiastic\"?", &["Bored", "Eager", "Calm", "Tired"], 1, "\"Eager\" means showing keen interest or enthusiasm."),
    quiz("en2", "Select the correctly spelled word:", &["Accomodate", "Acommodate", "Accommodate", "Acomodate"], 2, "\"Accommodate\" is spelled with two 'c's and two 'm's."),
];

const HI_QUIZ: &[Question] = &[
    quiz("hi1", "How do you say \"Hello\" in Hindi?", &["Namaste", "Shukriya", "Alvida", "Suprabhat"], 0, "\"Namaste\" is the most common respectful greeting in Hindi."),
    quiz("hi2", "What is the Hindi word for \"Water\"?", &["Hawa", "Paani", "Khana", "Makan"], 1, "\"Paani\" (पानी) means water."),
];

const ES_QUIZ: &[Question] = &[
    quiz("es1", "How do you say \"Thank you\" in Spanish?", &["Hola", "Por favor", "Gracias", "De nada"], 2, "\"Gracias\" means thank you."),
    quiz("es2", "Translate \"The red table\" to Spanish.", &["El mesa rojo", "La mesa roja", "La mesa rojo", "El mesa roja"], 1, "Table (Mesa) is feminine, so it uses \"La\" and \"roja\"."),
];

const FR_QUIZ: &[Question] = &[
    quiz("fr1", "Translate \"The red apple\" to French.", &["La pomme rouge", "Le pomme rouge", "La rouge pomme", "L'apple rouge"], 0, "In French, adjectives like \"rouge\" usually follow the noun \"pomme\"."),
    quiz("fr2", "How do you say \"Please\" in French?", &["Merci", "De rien", "S'il vous plaît", "Bonjour"], 2, "\"S'il vous plaît\" is the formal way to say please."),
];

const DE_QUIZ: &[Question] = &[
    quiz("de1", "How do you say \"Thank you\" in German?", &["Bitte", "Danke", "Hallo", "Tschüss"], 1, "\"Danke\" is the standard way to say thank you."),
    quiz("de2", "What is the plural of \"Das Buch\" (The book)?", &["Die Bücher", "Der Buchs", "Das Buches", "Die Buch"], 0, "The plural of \"Buch\" is \"Bücher\", and it takes the plural article \"die\"."),
];

#[must_use]
pub fn quiz_questions(code: &str) -> &'static [Question] {
    match normalize_code(code).as_str() {
        "en" => EN_QUIZ,
        "hi" => HI_QUIZ,
        "es" => ES_QUIZ,
        "fr" => FR_QUIZ,
        "de" => DE_QUIZ,
        _ => &[],
    }
}

// =============================================================================
// GRADING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Whole-number percentage; 0 for an empty quiz.
    #[must_use]
    pub fn percent(self) -> usize {
        if self.total == 0 { 0 } else { self.correct * 100 / self.total }
    }
}

/// Grade chosen option indexes against `questions`, position by position.
/// Missing answers count as wrong; extra answers are ignored.
#[must_use]
pub fn grade(questions: &[Question], answers: &[usize]) -> Score {
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.correct_answer == **answer)
        .count();
    Score { correct, total: questions.len() }
}
