use domain::models::{LearningStyle, PerformanceLevel};
use domain::subjects::Subject;

const THEME_REQUEST: &str = "explain it with my theme";
const DEFAULT_THEME: &str = "default";
const DEFAULT_INTERESTS: &str = "general topics";

/// (subject id, theme, rule)
const THEMATIC_RULES: &[(&str, &str, &str)] = &[
    ("mathematics", "space", "Frame every quantity as distances, orbits or fuel on a space mission."),
    ("mathematics", "sports", "Use scores, averages and match statistics for every example."),
    ("physics", "space", "Explain forces and motion through rockets, satellites and planets."),
    ("physics", "sports", "Use balls, runners and collisions on the field to show each law."),
    ("chemistry", "cooking", "Describe reactions as recipes: ingredients are reactants, the dish is the product."),
    ("biology", "cooking", "Compare cell processes to a busy restaurant kitchen."),
    ("biology", "space", "Explain how each process would work for an astronaut living in orbit."),
    ("history", "adventure", "Tell events as an expedition journal with clear dates and places."),
    ("english", "music", "Use song lyrics and rhythm to illustrate grammar and structure."),
    ("python", "games", "Build every example around a small game loop or score counter."),
];

/// Student attributes that shape the tutor instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub learning_style: LearningStyle,
    pub performance_level: PerformanceLevel,
    pub interests: Option<String>,
    pub theme: String,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            learning_style: LearningStyle::default(),
            performance_level: PerformanceLevel::default(),
            interests: None,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

pub struct PromptContext<'a> {
    pub subject: &'a Subject,
    pub profile: &'a StudentProfile,
    /// Messages in the log before the current request.
    pub message_count: usize,
    pub user_message: &'a str,
}

pub fn style_clause(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Visual => "- VISUAL learner. Explain using descriptive language and analogies. Suggest up to 10 YouTube search queries.",
        LearningStyle::Auditory => "- AUDITORY learner. Write in a clear, conversational, point-wise tone. Use bullet points.",
        LearningStyle::Kinesthetic => "- KINESTHETIC learner. Use practical application and step-by-step instructions in a numbered list.",
        LearningStyle::ReadWrite => "- READ/WRITE learner. Use headings, bullet points, and **bolded keywords** to structure the information.",
    }
}

pub fn performance_clause(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Good => "Move quickly, skip basic definitions and finish with one challenge question.",
        PerformanceLevel::Average => "Balance explanation with examples and check understanding with one quick question.",
        PerformanceLevel::Weak => "Use very simple words, short sentences and one worked example before any new idea.",
    }
}

pub fn thematic_instruction(subject_id: &str, theme: &str) -> Option<&'static str> {
    let theme = theme.trim().to_lowercase();
    THEMATIC_RULES
        .iter()
        .find(|(subject, name, _)| *subject == subject_id && *name == theme)
        .map(|(_, _, rule)| *rule)
}

/// Assemble the tutor's system instruction. Pure string work.
pub fn build_system_instruction(ctx: &PromptContext<'_>) -> String {
    let profile = ctx.profile;
    let mut instruction = format!(
        "You are an expert AI tutor for {}.\n\
**Brevity Rule:** Be concise and to the point. Provide a direct answer first, then a brief, step-by-step explanation.\n\
**Core Instruction:** Break down information into a point-wise format. Use headings and bullet points. **Bold key terms**.\n\
**Formatting Rule:** Do NOT use extra blank lines. Keep vertical spacing compact.",
        ctx.subject.name
    );

    let interests = profile
        .interests
        .as_deref()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| DEFAULT_INTERESTS.to_string());
    instruction.push_str(&format!(
        "\n\n**STUDENT PROFILE:**\n{}\n- **Performance Level:** {}. {}\n- The student is interested in {}. Use related analogies.",
        style_clause(profile.learning_style),
        profile.performance_level.as_str(),
        performance_clause(profile.performance_level),
        interests
    ));

    let theme = profile.theme.trim();
    let is_thematic_request = ctx.user_message.to_lowercase().contains(THEME_REQUEST);
    let is_initial_analysis = ctx.message_count <= 2;
    if (is_thematic_request || is_initial_analysis) && !theme.is_empty() && theme != DEFAULT_THEME {
        if let Some(rule) = thematic_instruction(ctx.subject.id, theme) {
            instruction.push_str(&format!(
                "\n\n**THEMATIC EXPLANATION REQUIRED:** You MUST explain the topic using the student's current theme, which is **'{}'**. Follow these theme-specific rules: {}",
                theme, rule
            ));
        }
    }

    if ctx.subject.is_math_heavy() {
        instruction.push_str("\n- For math problems, use LaTeX and show work in a step-by-step list.");
    }

    if profile.learning_style == LearningStyle::Visual {
        instruction.push_str(
            "\n\n**Response Format:** Do not put search queries in the explanation. End the reply with one fenced ```json block of the form {\"suggestedQueries\": [\"query one\", \"query two\"]}.",
        );
    }

    instruction
}

pub fn material_analysis_prompt(material: &str, teacher_comment: Option<&str>) -> String {
    let comment = teacher_comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("My teacher's comment is: \"{c}\"."))
        .unwrap_or_default();
    format!(
        "Please provide a comprehensive explanation of the following material. {comment} Here is the content:\n\n{material}"
    )
}

pub fn math_extraction_prompt(reply: &str) -> String {
    format!(
        "Extract only the mathematical content from the following response. Include only fractions, numbers, equations, and calculations. Do not include any explanatory text, just the clean math content in plain text or LaTeX format. If there are no mathematical elements, return an empty string.\n\nResponse to extract from:\n{reply}"
    )
}
