use domain::error::StudyPlanError;
use domain::gateway::ChatGateway;
use shared::utils::truncate_chars;

const SYLLABUS_LIMIT: usize = 2000;
const ANSWER_SOURCE_LIMIT: usize = 1500;
const PREVIOUS_PLAN_LIMIT: usize = 1000;

#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub syllabus: String,
    pub days: u32,
    pub learning_style: String,
    pub class_standard: String,
    pub subject: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerRequest {
    pub question_paper_text: String,
    pub textbook_text: Option<String>,
    pub subject: String,
}

#[derive(Debug, Clone, Default)]
pub struct AdaptRequest {
    pub score: Option<f64>,
    pub previous_plan: String,
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, StudyPlanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StudyPlanError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

pub fn performance_label(score: f64) -> &'static str {
    if score >= 90.0 {
        "excellent"
    } else if score >= 80.0 {
        "good"
    } else {
        "needs improvement"
    }
}

pub fn plan_prompt(request: &PlanRequest) -> Result<String, StudyPlanError> {
    let syllabus = require(&request.syllabus, "syllabus")?;
    if request.days == 0 {
        return Err(StudyPlanError::MissingField("days"));
    }
    let style = require(&request.learning_style, "learningStyle")?;
    let class_standard = require(&request.class_standard, "classStandard")?;
    let subject = require(&request.subject, "subject")?;
    let days = request.days;
    Ok(format!(
        "You are an expert AI tutor. Create a comprehensive study plan:

**STUDENT PROFILE:**
- Education Level: {class_standard}
- Subject: {subject}
- Learning Style: {style}
- Available Time: {days} days

**STUDY MATERIALS:**
{}

**CREATE:**
1. Day-by-day breakdown for {days} days
2. {style}-specific techniques
3. Clear learning objectives for each day
4. Self-assessment questions
5. Progress checkpoints
6. Weekly review sessions

Format with clear headings and bullet points. Make it actionable for {class_standard} students.",
        truncate_chars(syllabus, SYLLABUS_LIMIT)
    ))
}

pub fn answers_prompt(request: &AnswerRequest) -> Result<String, StudyPlanError> {
    let questions = require(&request.question_paper_text, "questionPaperText")?;
    let subject = require(&request.subject, "subject")?;
    let textbook = request.textbook_text.as_deref().unwrap_or("");
    Ok(format!(
        "Generate comprehensive answers for {subject} questions:

**TEXTBOOK:** {}
**QUESTIONS:** {}

Provide detailed, numbered answers with explanations.",
        truncate_chars(textbook, ANSWER_SOURCE_LIMIT),
        truncate_chars(questions, ANSWER_SOURCE_LIMIT)
    ))
}

pub fn adapt_prompt(request: &AdaptRequest) -> Result<String, StudyPlanError> {
    let score = request.score.ok_or(StudyPlanError::MissingField("score"))?;
    let previous = require(&request.previous_plan, "previousPlan")?;
    Ok(format!(
        "Adapt the study plan based on quiz performance:

**PERFORMANCE:** {score}% ({})
**PREVIOUS PLAN:** {}

Provide specific improvements and focus areas.",
        performance_label(score),
        truncate_chars(previous, PREVIOUS_PLAN_LIMIT)
    ))
}

/// Plan, answer and adaptation generators over the AI gateway.
pub struct StudyPlanService<G> {
    gateway: G,
}

impl<G: ChatGateway> StudyPlanService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    async fn run(&self, task: &'static str, prompt: String) -> Result<String, StudyPlanError> {
        self.gateway.generate(&prompt).await.map_err(|e| {
            tracing::error!(task, error = %e, "generation failed");
            StudyPlanError::Upstream(format!("Failed to {task}"))
        })
    }

    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<String, StudyPlanError> {
        let prompt = plan_prompt(request)?;
        self.run("generate plan", prompt).await
    }

    pub async fn generate_answers(&self, request: &AnswerRequest) -> Result<String, StudyPlanError> {
        let prompt = answers_prompt(request)?;
        self.run("generate answers", prompt).await
    }

    pub async fn adapt_plan(&self, request: &AdaptRequest) -> Result<String, StudyPlanError> {
        let prompt = adapt_prompt(request)?;
        self.run("adapt plan", prompt).await
    }
}
