use crate::console_speech::{ConsoleSpeech, PromptRecognizer};
use crate::material::read_material;
use anyhow::{anyhow, Context};
use application::attempt_service::DailyAttemptTracker;
use application::chat_service::ChatService;
use application::progress_service::ProgressTracker;
use application::prompt_builder::StudentProfile;
use application::session_service::SessionStore;
use application::speech_service::VoiceInput;
use application::study_plan_service::{AdaptRequest, AnswerRequest, PlanRequest, StudyPlanService};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use domain::attempt_policy::{AttemptStatus, MAX_DAILY_ATTEMPTS};
use domain::error::{AttemptError, ChatError};
use domain::models::{Feedback, LearningStyle, Message, PerformanceLevel, UserData};
use domain::notes::{NotesExporter, DEFAULT_NOTES_FILE};
use domain::speech::SpeechStatus;
use domain::storage::KeyValueStore;
use domain::subjects::{find_subject, Subject, SUBJECTS};
use infrastructure::ai_gateway::AiGateway;
use infrastructure::backend_client::BackendClient;
use infrastructure::config::Config;
use infrastructure::docx_notes::DocxNotesExporter;
use infrastructure::sqlite_store::SqliteStore;
use infrastructure::youtube_client::YouTubeClient;
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type TutorChat = ChatService<AiGateway, YouTubeClient, ConsoleSpeech>;

#[derive(Parser)]
#[command(name = "learnmyway")]
#[command(about = "AI study planner and per-subject tutor")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chat with the tutor for a subject
    Chat(ChatArgs),
    /// Manage saved chat sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Generate a day-by-day study plan from a syllabus file
    Plan {
        #[arg(long)]
        syllabus: PathBuf,
        #[arg(long)]
        days: u32,
        #[arg(long, default_value = "visual")]
        style: String,
        #[arg(long = "class")]
        class_standard: String,
        #[arg(long)]
        subject: String,
    },
    /// Generate answers for a question paper
    Answers {
        #[arg(long)]
        questions: PathBuf,
        #[arg(long)]
        textbook: Option<PathBuf>,
        #[arg(long)]
        subject: String,
    },
    /// Adapt a previous plan to a quiz score
    Adapt {
        #[arg(long)]
        score: f64,
        #[arg(long)]
        previous_plan: PathBuf,
    },
    /// Suggest tutorial videos for a subject
    Videos { subject: String },
    /// Record an attempt at a daily challenge
    Challenge {
        activity: String,
        /// Mark today's challenge as completed instead
        #[arg(long)]
        complete: bool,
    },
    /// Show concept progress scores
    Progress {
        /// Also show the stored performance level for this subject
        #[arg(long)]
        subject: Option<String>,
    },
    /// Forget all saved chats, progress and challenge counters
    Logout,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Subject id, e.g. "science" or "maths"
    pub subject: String,
    /// visual, auditory, kinesthetic or read/write
    #[arg(long)]
    pub style: Option<String>,
    /// good, average or weak
    #[arg(long)]
    pub level: Option<String>,
    #[arg(long)]
    pub interests: Option<String>,
    #[arg(long, default_value = "default")]
    pub theme: String,
    /// Resume a saved session by id
    #[arg(long)]
    pub session: Option<String>,
    /// Explain a teacher's material file before chatting
    #[arg(long)]
    pub material: Option<PathBuf>,
    /// Teacher's comment sent with the material
    #[arg(long)]
    pub comment: Option<String>,
    /// Read the profile from the backend for this user id
    #[arg(long)]
    pub uid: Option<String>,
}

#[derive(Subcommand)]
pub enum SessionAction {
    List { subject: String },
    Rename { subject: String, id: String, name: String },
    Delete { subject: String, id: String },
}

pub struct CliApp {
    config: Config,
    store: Arc<dyn KeyValueStore>,
}

impl CliApp {
    pub fn new() -> Result<Self> {
        let config = Config::load();
        let store = SqliteStore::new(&config.store_path)
            .with_context(|| format!("opening store at {}", config.store_path.display()))?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        match cli.command {
            Command::Chat(args) => self.handle_chat(args).await,
            Command::Sessions { action } => self.handle_sessions(action),
            Command::Plan {
                syllabus,
                days,
                style,
                class_standard,
                subject,
            } => {
                let request = PlanRequest {
                    syllabus: read_material(&syllabus)?,
                    days,
                    learning_style: style,
                    class_standard,
                    subject,
                };
                let plan = self.study_plans()?.generate_plan(&request).await?;
                println!("{plan}");
                Ok(())
            }
            Command::Answers {
                questions,
                textbook,
                subject,
            } => {
                let request = AnswerRequest {
                    question_paper_text: read_material(&questions)?,
                    textbook_text: textbook.as_deref().map(read_material).transpose()?,
                    subject,
                };
                let answers = self.study_plans()?.generate_answers(&request).await?;
                println!("{answers}");
                Ok(())
            }
            Command::Adapt {
                score,
                previous_plan,
            } => {
                let request = AdaptRequest {
                    score: Some(score),
                    previous_plan: std::fs::read_to_string(&previous_plan)
                        .with_context(|| format!("reading {}", previous_plan.display()))?,
                };
                let adapted = self.study_plans()?.adapt_plan(&request).await?;
                println!("{adapted}");
                Ok(())
            }
            Command::Videos { subject } => self.handle_videos(&subject).await,
            Command::Challenge { activity, complete } => self.handle_challenge(&activity, complete),
            Command::Progress { subject } => self.handle_progress(subject.as_deref()),
            Command::Logout => self.handle_logout(),
        }
    }

    fn study_plans(&self) -> Result<StudyPlanService<AiGateway>> {
        Ok(StudyPlanService::new(AiGateway::from_config(&self.config)?))
    }

    fn subject(id: &str) -> Result<Subject> {
        find_subject(id).ok_or_else(|| {
            let known: Vec<&str> = SUBJECTS.iter().map(|s| s.id).collect();
            anyhow!("unknown subject '{id}'; known subjects: {}", known.join(", "))
        })
    }

    async fn user_data(&self, uid: Option<&str>) -> UserData {
        let (Some(uid), Some(backend)) = (uid, BackendClient::from_config(&self.config)) else {
            return UserData::default();
        };
        match backend.fetch_user_data(uid).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(uid, error = %e, "could not read profile; using defaults");
                UserData::default()
            }
        }
    }

    /// Flags win over the stored level, which wins over the backend profile.
    async fn build_profile(&self, args: &ChatArgs, subject: &Subject) -> StudentProfile {
        let user = self.user_data(args.uid.as_deref()).await;
        let stored = ProgressTracker::new(self.store.clone()).performance_for(subject.name);
        StudentProfile {
            learning_style: args
                .style
                .as_deref()
                .map(LearningStyle::parse)
                .unwrap_or_else(|| user.learning_style()),
            performance_level: args
                .level
                .as_deref()
                .map(PerformanceLevel::parse)
                .or(stored)
                .or_else(|| user.performance_for(subject.name))
                .unwrap_or_default(),
            interests: args.interests.clone().or(user.interests),
            theme: args.theme.clone(),
        }
    }

    async fn handle_chat(&self, args: ChatArgs) -> Result<()> {
        let subject = Self::subject(&args.subject)?;
        let profile = self.build_profile(&args, &subject).await;
        let sessions = SessionStore::new(self.store.clone());
        let mut chat: TutorChat = ChatService::new(
            AiGateway::from_config(&self.config)?,
            YouTubeClient::from_config(&self.config),
            ConsoleSpeech::default(),
            self.store.clone(),
            subject,
            profile,
        );

        println!(
            "{} {} ({} learner, {} level)",
            "Subject:".green().bold(),
            subject.name,
            chat.profile().learning_style.as_str(),
            chat.profile().performance_level.as_str()
        );

        if let Some(id) = args.session.as_deref() {
            let session = sessions
                .find_session(subject.id, id)
                .ok_or_else(|| anyhow!("no session '{id}' for {}", subject.name))?;
            chat.load_session(&session);
        }
        for message in chat.messages() {
            render_message(message);
        }

        if let Some(path) = args.material.as_deref() {
            let material = read_material(path)?;
            println!("{}", "Analyzing your teacher's material...".yellow());
            let reply = chat.analyze_material(&material, args.comment.as_deref()).await?;
            render_reply(&chat, &reply);
        }

        self.chat_loop(&mut chat, &sessions).await
    }

    async fn chat_loop(&self, chat: &mut TutorChat, sessions: &SessionStore) -> Result<()> {
        let mut voice = VoiceInput::new(PromptRecognizer);
        println!("{}", "Type a question, or /help for commands.".dimmed());
        loop {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("You")
                .allow_empty(true)
                .interact_text()?;
            let input = input.trim();
            if input.is_empty() {
                continue;
            }
            if !input.starts_with('/') {
                self.send(chat, input).await?;
                continue;
            }

            let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
            let rest = rest.trim();
            match command {
                "/exit" | "/quit" => break,
                "/help" => print_help(),
                "/new" => {
                    chat.start_new_chat();
                    render_message(&chat.subject().welcome_message());
                }
                "/save" => self.save_session(chat, sessions, rest)?,
                "/sessions" => list_sessions(sessions, chat.subject()),
                "/load" => match sessions.find_session(chat.subject().id, rest) {
                    Some(session) => {
                        chat.load_session(&session);
                        println!("{} {}", "Loaded".green(), session.name);
                        for message in chat.messages() {
                            render_message(message);
                        }
                    }
                    None => println!("{}", format!("No session '{rest}'.").red()),
                },
                "/rename" => {
                    let Some(id) = chat.current_session_id().map(str::to_string) else {
                        println!("{}", "Save the chat before renaming it.".yellow());
                        continue;
                    };
                    if sessions.rename_session(chat.subject().id, &id, rest)? {
                        println!("{}", "Session renamed.".green());
                    } else {
                        println!("{}", "Give a non-empty name.".yellow());
                    }
                }
                "/speak" => {
                    let text = chat.state().last_bot_message().map(|m| m.text.clone());
                    match text {
                        Some(text) if chat.speak(&text) => {}
                        Some(_) => println!("{}", "Read-aloud is for auditory learners.".yellow()),
                        None => {}
                    }
                }
                "/pause" => {
                    if chat.toggle_speech() == SpeechStatus::Idle {
                        println!("{}", "Nothing is being read.".dimmed());
                    }
                }
                "/voice" => {
                    let mut pending = String::new();
                    if voice.start_listening(&mut pending) {
                        voice.stop_listening();
                        self.send(chat, &pending).await?;
                    } else if let Some(error) = voice.last_error() {
                        println!("{}", format!("Voice input failed: {error}").red());
                    }
                }
                "/export" => {
                    let path = if rest.is_empty() { DEFAULT_NOTES_FILE } else { rest };
                    export_notes(chat, &DocxNotesExporter, Path::new(path))?;
                }
                "/copy" => {
                    let text = chat.state().last_bot_message().map(|m| m.text.clone());
                    if let Some(text) = text {
                        copy_to_clipboard(&text);
                    }
                }
                "/feedback" => {
                    let feedback = match rest {
                        "good" => Feedback::Good,
                        "adjust" => Feedback::Adjust,
                        _ => {
                            println!("{}", "Usage: /feedback good|adjust".yellow());
                            continue;
                        }
                    };
                    let Some(id) = chat.state().last_bot_message().map(|m| m.id.clone()) else {
                        continue;
                    };
                    match chat.give_feedback(&id, feedback).await? {
                        Some(reply) => render_reply(chat, &reply),
                        None => println!("{}", "Thanks for the feedback!".green()),
                    }
                }
                "/rec" => {
                    let index = rest.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                    match index {
                        Some(index) => match chat.click_recommendation(index).await {
                            Ok(reply) => render_reply(chat, &reply),
                            Err(ChatError::EmptyMessage) => {
                                println!("{}", "No such suggestion.".yellow())
                            }
                            Err(e) => return Err(e.into()),
                        },
                        None => println!("{}", "Usage: /rec <number>".yellow()),
                    }
                }
                _ => println!("{}", format!("Unknown command {command}; try /help.").yellow()),
            }
        }
        Ok(())
    }

    async fn send(&self, chat: &mut TutorChat, text: &str) -> Result<()> {
        match chat.send(text).await {
            Ok(reply) => render_reply(chat, &reply),
            Err(ChatError::Busy) => println!("{}", "Still thinking, please wait.".yellow()),
            Err(ChatError::EmptyMessage) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn save_session(&self, chat: &mut TutorChat, sessions: &SessionStore, name: &str) -> Result<()> {
        let subject_id = chat.subject().id;
        let messages = chat.messages().to_vec();
        if let Some(id) = chat.current_session_id().map(str::to_string) {
            if sessions.update_messages(subject_id, &id, messages.clone())? {
                println!("{}", "Session updated.".green());
                return Ok(());
            }
        }
        let name = if name.is_empty() {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Session name")
                .interact_text()?
        } else {
            name.to_string()
        };
        let session = sessions.create_session(subject_id, &name, messages)?;
        chat.mark_saved(session.id.clone());
        println!("{} {} ({})", "Saved".green(), session.name, session.id.dimmed());
        Ok(())
    }

    fn handle_sessions(&self, action: SessionAction) -> Result<()> {
        let sessions = SessionStore::new(self.store.clone());
        match action {
            SessionAction::List { subject } => list_sessions(&sessions, &Self::subject(&subject)?),
            SessionAction::Rename { subject, id, name } => {
                let subject = Self::subject(&subject)?;
                if sessions.rename_session(subject.id, &id, &name)? {
                    println!("{}", "Session renamed.".green());
                } else {
                    println!("{}", "No session renamed (unknown id or blank name).".yellow());
                }
            }
            SessionAction::Delete { subject, id } => {
                let subject = Self::subject(&subject)?;
                let Some(session) = sessions.find_session(subject.id, &id) else {
                    println!("{}", format!("No session '{id}'.").yellow());
                    return Ok(());
                };
                if !ask_confirmation(&format!("Delete session \"{}\"?", session.name), false)? {
                    println!("{}", "Kept.".yellow());
                    return Ok(());
                }
                sessions.delete_session(subject.id, &id)?;
                println!("{}", "Session deleted.".green());
            }
        }
        Ok(())
    }

    async fn handle_videos(&self, subject: &str) -> Result<()> {
        let youtube = YouTubeClient::from_config(&self.config);
        let videos = youtube.search_tutorials(subject).await?;
        if videos.is_empty() {
            println!("{}", "No tutorials found.".yellow());
        }
        for (i, video) in videos.iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).blue(), video.title.bold());
            println!("      {}", video.url.cyan());
        }
        Ok(())
    }

    fn handle_challenge(&self, activity: &str, complete: bool) -> Result<()> {
        let tracker = DailyAttemptTracker::new(self.store.clone(), activity);
        let today = DailyAttemptTracker::today();
        if complete {
            tracker.mark_completed(today)?;
            println!("{}", format!("{} completed for today.", tracker.activity()).green());
            return Ok(());
        }
        match tracker.record_attempt(today) {
            Ok(attempts) => println!(
                "{}",
                format!("Attempt {attempts} of {MAX_DAILY_ATTEMPTS} for {}.", tracker.activity()).green()
            ),
            Err(AttemptError::Locked(reason)) => {
                println!("{}", format!("{} is locked: {reason}.", tracker.activity()).red())
            }
            Err(e) => return Err(e.into()),
        }
        if let AttemptStatus::Open { remaining, .. } = tracker.status(today)? {
            println!("{}", format!("{remaining} attempt(s) left today.").dimmed());
        }
        Ok(())
    }

    fn handle_logout(&self) -> Result<()> {
        if !ask_confirmation("Delete all local chats, progress and challenge records?", false)? {
            println!("{}", "Nothing removed.".yellow());
            return Ok(());
        }
        self.store.clear()?;
        tracing::info!("local store cleared");
        println!("{}", "Logged out; local data removed.".green());
        Ok(())
    }

    fn handle_progress(&self, subject: Option<&str>) -> Result<()> {
        let progress = ProgressTracker::new(self.store.clone());
        let scores = progress.progress();
        if scores.is_empty() {
            println!("{}", "No progress recorded yet.".dimmed());
        }
        for (key, score) in &scores {
            println!("  {:>5.0}%  {}", score * 100.0, key);
        }
        if let Some(id) = subject {
            let subject = Self::subject(id)?;
            let level = progress.performance_for(subject.name).unwrap_or_default();
            println!("{} {}", format!("{}:", subject.name).bold(), level.as_str());
        }
        Ok(())
    }
}

fn print_help() {
    for (command, about) in [
        ("/new", "start a new chat"),
        ("/save [name]", "save or update this chat"),
        ("/sessions", "list saved chats"),
        ("/load <id>", "open a saved chat"),
        ("/rename <name>", "rename the saved chat"),
        ("/rec <n>", "send suggestion n"),
        ("/feedback good|adjust", "rate the last answer"),
        ("/speak", "read the last answer aloud"),
        ("/pause", "pause or resume reading"),
        ("/voice", "dictate a question"),
        ("/export [file]", "save the last answer as notes"),
        ("/copy", "copy the last answer"),
        ("/exit", "quit"),
    ] {
        println!("  {:<24} {}", command.cyan(), about);
    }
}

fn list_sessions(sessions: &SessionStore, subject: &Subject) {
    let list = sessions.sessions_for(subject.id);
    if list.is_empty() {
        println!("{}", format!("No saved chats for {}.", subject.name).dimmed());
    }
    for session in list {
        println!(
            "  {}  {} ({}, {} messages)",
            session.id.dimmed(),
            session.name.bold(),
            session.weekday,
            session.messages.len()
        );
    }
}

fn export_notes(chat: &TutorChat, exporter: &impl NotesExporter, path: &Path) -> Result<()> {
    match chat.last_answer_notes().filter(|notes| !notes.is_empty()) {
        Some(notes) => {
            exporter.export(&notes, path)?;
            println!("{} {}", "Notes saved to".green(), path.display());
        }
        None => println!("{}", "No answer to export yet.".yellow()),
    }
    Ok(())
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => println!("{}", "Copied to clipboard.".green()),
        Err(e) => println!("{}", format!("Clipboard unavailable: {e}").red()),
    }
}

fn render_message(message: &Message) {
    if message.is_bot {
        println!("{} {}", "Tutor:".green().bold(), message.text);
    } else {
        println!("{} {}", "You:".blue().bold(), message.text);
    }
    if let Some(videos) = &message.video_list {
        for video in videos {
            println!("  {} {}", "▶".red(), video.video_url.cyan());
        }
    }
}

fn render_reply(chat: &TutorChat, reply: &Message) {
    render_message(reply);
    for (i, suggestion) in chat.state().recommended_messages.iter().enumerate() {
        println!("  {} {}", format!("[{}]", i + 1).blue(), suggestion.dimmed());
    }
}
