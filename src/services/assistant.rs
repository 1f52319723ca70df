// src/services/assistant.rs

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::{
        cache::{Clock, SystemClock},
        error::AppError,
        fallback::{FallbackChain, Outcome, Strategy},
    },
    models::chat::{AiResponse, AssistantReply, ChatMessage},
    services::ai_backend::AiBackendClient,
};

pub const HISTORY_CAP: usize = 50;
/// Conversas sem atividade por mais que isso são descartadas.
pub const CONVERSATION_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

const FOOTBALL_KEYWORDS: &[&str] = &[
    "formation", "tactic", "strategy", "analysis", "player", "match", "team", "training",
    "injury", "performance", "goal", "assist", "clean sheet", "add", "remove", "create",
    "sign", "transfer", "manage",
];

const ERROR_PHRASES: &[&str] = &["Sorry, I encountered an error", "technical difficulties"];

// =============================================================================
//  MEMÓRIA DA CONVERSA
// =============================================================================

struct Conversation {
    messages: VecDeque<ChatMessage>,
    last_active: Instant,
}

/// Histórico por usuário, só em memória, limitado às últimas `cap`
/// mensagens. Conversas paradas há mais de `idle_ttl` são removidas.
#[derive(Clone)]
pub struct ConversationMemory {
    inner: Arc<Mutex<HashMap<Uuid, Conversation>>>,
    cap: usize,
    idle_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ConversationMemory {
    pub fn new(cap: usize) -> Self {
        Self::with_clock(cap, CONVERSATION_IDLE_TTL, Arc::new(SystemClock))
    }

    pub fn with_clock(cap: usize, idle_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            cap,
            idle_ttl,
            clock,
        }
    }

    pub fn push(&self, user_id: Uuid, message: ChatMessage) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.retain(|_, c| now.duration_since(c.last_active) < self.idle_ttl);

        let conversation = inner.entry(user_id).or_insert_with(|| Conversation {
            messages: VecDeque::new(),
            last_active: now,
        });
        conversation.last_active = now;
        conversation.messages.push_back(message);
        while conversation.messages.len() > self.cap {
            conversation.messages.pop_front();
        }
    }

    pub fn history(&self, user_id: Uuid) -> Vec<ChatMessage> {
        let now = self.clock.now();
        let mut inner = self.lock();
        match inner.get(&user_id) {
            Some(c) if now.duration_since(c.last_active) < self.idle_ttl => {
                c.messages.iter().cloned().collect()
            }
            Some(_) => {
                inner.remove(&user_id);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn clear(&self, user_id: Uuid) {
        self.lock().remove(&user_id);
    }

    /// Quantos usuários têm conversa guardada.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Conversation>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
//  ESTRATÉGIAS
// =============================================================================

/// O que cada estratégia recebe. `earlier` é o histórico antes da
/// mensagem atual.
pub struct AssistantRequest {
    pub user_id: Uuid,
    pub message: String,
    pub context: Option<Value>,
    pub earlier: Vec<ChatMessage>,
}

impl AssistantRequest {
    fn is_follow_up(&self) -> bool {
        let start = self.earlier.len().saturating_sub(3);
        self.earlier[start..].iter().any(|m| {
            let content = m.content.to_lowercase();
            content.contains("formation") || content.contains("tactics") || content.contains("training")
        })
    }
}

pub struct BackendStrategy {
    backend: AiBackendClient,
}

#[async_trait]
impl Strategy<AssistantRequest, AiResponse> for BackendStrategy {
    fn name(&self) -> &'static str {
        "backend"
    }

    async fn attempt(&self, request: &AssistantRequest) -> Outcome<AiResponse> {
        let reply = match self
            .backend
            .chat(request.user_id, &request.message, request.context.clone())
            .await
        {
            Ok(reply) => reply,
            Err(e) => return Outcome::Unavailable(e.to_string()),
        };

        let response = response_from_backend(&reply.data);
        if is_valid_response(&response) {
            Outcome::Success(response)
        } else {
            Outcome::Unavailable("backend returned an unusable response".to_string())
        }
    }
}

pub struct KeywordTemplateStrategy;

#[async_trait]
impl Strategy<AssistantRequest, AiResponse> for KeywordTemplateStrategy {
    fn name(&self) -> &'static str {
        "keyword_templates"
    }

    async fn attempt(&self, request: &AssistantRequest) -> Outcome<AiResponse> {
        let lower = request.message.to_lowercase();
        if !FOOTBALL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Outcome::Unavailable("no football keyword".to_string());
        }
        match keyword_template(&lower, request.is_follow_up()) {
            Some(response) => Outcome::Degraded(response),
            None => Outcome::Unavailable("no matching template".to_string()),
        }
    }
}

pub struct GenericStrategy;

#[async_trait]
impl Strategy<AssistantRequest, AiResponse> for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    async fn attempt(&self, request: &AssistantRequest) -> Outcome<AiResponse> {
        let lead = if request.is_follow_up() { "Given our ongoing conversation, " } else { "" };
        Outcome::Degraded(AiResponse {
            content: format!(
                "I understand you're asking about \"{}\". {lead}As your tactical assistant, I'm here to \
                 provide detailed, practical advice that you can implement immediately. Whether it's \
                 formations, training methods, player development, or match strategies, I can help you \
                 make informed decisions. What specific aspect of football management would you like to \
                 explore together?",
                request.message
            ),
            confidence: 75,
            suggestions: strings(&[
                "Formation advice",
                "Training strategies",
                "Player development",
                "Match preparation",
                "Team management",
            ]),
            follow_up_questions: strings(&[
                "What's your biggest tactical challenge right now?",
                "Would you like help with a specific formation?",
                "Are you preparing for an important match?",
            ]),
            intent: None,
            entities: None,
        })
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, base_delay: Duration::from_millis(500) }
    }
}

#[derive(Clone)]
pub struct AssistantService {
    backend: AiBackendClient,
    memory: ConversationMemory,
    chain: Arc<FallbackChain<AssistantRequest, AiResponse>>,
    retry: RetryPolicy,
}

impl AssistantService {
    pub fn new(backend: AiBackendClient) -> Self {
        Self::with_retry(backend, RetryPolicy::default())
    }

    pub fn with_retry(backend: AiBackendClient, retry: RetryPolicy) -> Self {
        let chain = FallbackChain::new()
            .with(BackendStrategy { backend: backend.clone() })
            .with(KeywordTemplateStrategy)
            .with(GenericStrategy);

        Self {
            backend,
            memory: ConversationMemory::new(HISTORY_CAP),
            chain: Arc::new(chain),
            retry,
        }
    }

    pub async fn process_message(
        &self,
        user_id: Uuid,
        message: &str,
        context: Option<Value>,
    ) -> AssistantReply {
        if message.trim().is_empty() {
            return AssistantReply { response: helpful_response(), source: "helpful", degraded: false };
        }

        let earlier = self.memory.history(user_id);
        self.memory.push(user_id, ChatMessage::user(message));

        let request = AssistantRequest {
            user_id,
            message: message.to_string(),
            context,
            earlier,
        };

        let reply = match self.chain.resolve(&request).await {
            Some(resolution) => {
                let degraded = !resolution.outcome.is_success();
                let enhance = resolution.outcome.is_success();
                match resolution.outcome.into_value() {
                    Some(response) => {
                        let response = if enhance {
                            enhance_response(response, message, request.earlier.is_empty())
                        } else {
                            response
                        };
                        AssistantReply { response, source: resolution.strategy, degraded }
                    }
                    None => recovery_reply(message),
                }
            }
            None => recovery_reply(message),
        };

        if reply.degraded {
            tracing::info!(%user_id, source = reply.source, "assistente respondeu em modo degradado");
        }

        self.memory.push(user_id, ChatMessage::assistant(&reply.response));
        reply
    }

    pub fn history(&self, user_id: Uuid) -> Vec<ChatMessage> {
        self.memory.history(user_id)
    }

    pub fn clear_history(&self, user_id: Uuid) {
        self.memory.clear(user_id);
    }

    /// Busca os dados do time no backend de IA, com backoff exponencial.
    pub async fn load_team_data(&self, user_id: Uuid) -> Result<Value, AppError> {
        let mut delay = self.retry.base_delay;
        let mut attempt = 1;
        loop {
            match self.backend.get_team_data().await {
                Ok(reply) => return Ok(reply.data),
                Err(e) if attempt >= self.retry.attempts => {
                    tracing::warn!(%user_id, attempt, error = ?e, "desistindo de carregar dados do time");
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(%user_id, attempt, error = ?e, "tentando de novo");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }
}

fn recovery_reply(message: &str) -> AssistantReply {
    AssistantReply { response: recovery_response(message), source: "recovery", degraded: true }
}

// =============================================================================
//  RESPOSTAS
// =============================================================================

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
}

/// Converte o JSON do backend; campos ausentes caem nos padrões por intenção.
pub fn response_from_backend(data: &Value) -> AiResponse {
    let intent = data.get("intent").and_then(Value::as_str).map(str::to_string);
    let content = data
        .get("response")
        .or_else(|| data.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("I understand your question. Here's my analysis based on your team data.")
        .to_string();

    AiResponse {
        content,
        confidence: 95,
        suggestions: string_list(data.get("suggestions"))
            .unwrap_or_else(|| suggestions_for(intent.as_deref())),
        follow_up_questions: string_list(data.get("followUpQuestions"))
            .unwrap_or_else(|| follow_ups_for(intent.as_deref())),
        intent,
        entities: data.get("entities").cloned(),
    }
}

pub fn is_valid_response(response: &AiResponse) -> bool {
    !response.content.trim().is_empty()
        && response.confidence > 0
        && !ERROR_PHRASES.iter().any(|p| response.content.contains(p))
}

pub fn enhance_response(mut response: AiResponse, message: &str, first_exchange: bool) -> AiResponse {
    let lower = response.content.to_lowercase();
    if first_exchange && !lower.contains("hello") && !lower.contains("hi") {
        response.content = format!("Hello! {}", response.content);
    }
    if message.to_lowercase().contains("help") {
        response.content = format!("I'm here to help! {}", response.content);
    }
    if !response.content.ends_with(['?', '.', '!']) {
        response.content.push_str(". What would you like to know more about?");
    }
    response.confidence = (response.confidence + 5).min(95);
    response
}

pub fn helpful_response() -> AiResponse {
    AiResponse {
        content: "I'm here to help with your tactical questions! You can ask me about formations, \
                  player analysis, training strategies, or match preparation. What would you like to discuss?"
            .to_string(),
        confidence: 85,
        suggestions: strings(&["Analyze team formation", "Get training advice", "Player performance tips"]),
        follow_up_questions: strings(&[
            "What formation should I use?",
            "How can I improve my team's fitness?",
            "What are effective training drills?",
        ]),
        intent: None,
        entities: None,
    }
}

pub fn recovery_response(message: &str) -> AiResponse {
    const OPENERS: [&str; 3] = [
        "I apologize for the technical difficulty. Let me try to help you with that question in a different way.",
        "I'm experiencing some connectivity issues, but I can still provide tactical advice based on my knowledge.",
        "There seems to be a temporary issue, but I'm still here to help with your football questions.",
    ];
    let opener = OPENERS[message.len() % OPENERS.len()];

    AiResponse {
        content: format!("{opener} You asked about: \"{message}\". {}", contextual_advice(message)),
        confidence: 60,
        suggestions: strings(&["Try rephrasing your question", "Ask about formations", "Get training tips"]),
        follow_up_questions: strings(&[
            "What specific area would you like help with?",
            "Should I explain football tactics?",
        ]),
        intent: None,
        entities: None,
    }
}

fn contextual_advice(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    if lower.contains("formation") {
        "For formations, consider your players' strengths and the opponent's weaknesses. A balanced approach often works best."
    } else if lower.contains("training") {
        "For training, focus on match-realistic scenarios and maintain a good balance between technical and physical work."
    } else if lower.contains("player") {
        "For player development, individual assessment and targeted improvement plans yield the best results."
    } else {
        "I can help you with tactical analysis, formation advice, training strategies, and player development. What interests you most?"
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

// Templates por tema, na ordem de prioridade.
fn keyword_template(lower: &str, follow_up: bool) -> Option<AiResponse> {
    let template = |content: String, confidence: u8, suggestions: &[&str], questions: &[&str]| AiResponse {
        content,
        confidence,
        suggestions: strings(suggestions),
        follow_up_questions: strings(questions),
        intent: None,
        entities: None,
    };
    let lead = |phrase: &'static str| if follow_up { phrase } else { "" };

    if contains_any(
        lower,
        &["add", "remove", "create", "delete", "sign", "transfer", "buy", "sell", "release", "manage", "organize", "schedule"],
    ) {
        return Some(template(
            format!(
                "I can help you with team management tasks! {}In a real system, I would be able to perform \
                 actions like adding players, scheduling matches, and managing your team roster. For example, \
                 if you wanted to add a new player, I would guide you through the process of scouting, contract \
                 negotiation, and integration into your team. What specific team management task would you like \
                 to explore?",
                lead("Building on our previous discussion, ")
            ),
            90,
            &["Add a new player", "Schedule a match", "Transfer a player"],
            &[
                "What position are you looking to fill?",
                "What is your budget for transfers?",
                "When would you like to schedule the match?",
            ],
        ));
    }

    if contains_any(lower, &["formation", "lineup", "tactic"]) {
        return Some(template(
            format!(
                "Great question about formations! {}The key to a successful formation is balancing your team's \
                 strengths with the opponent's weaknesses. For example, if you're facing a team that struggles \
                 with wide play, a 4-3-3 formation with attacking wingers could be very effective. What's your \
                 current formation, and what challenges are you facing with it?",
                lead("Building on our previous discussion, ")
            ),
            88,
            &["Explain 4-3-3 formation", "Counter-attacking strategies", "Defensive formations"],
            &[
                "What formation does your opponent typically use?",
                "Do you prefer attacking or defensive play?",
                "Which players are your key strengths?",
            ],
        ));
    }

    if contains_any(lower, &["training", "drill", "practice"]) {
        return Some(template(
            format!(
                "Excellent focus on training! {}Effective training should be specific, measurable, and \
                 game-realistic. I recommend the 80/20 rule: 80% of training should simulate real match \
                 conditions, while 20% focuses on isolated skill development. What specific skills or areas \
                 would you like your team to improve?",
                lead("Continuing from what we discussed, ")
            ),
            85,
            &["Passing drills", "Fitness training", "Set piece practice"],
            &[
                "What's your team's biggest weakness?",
                "How often do you train per week?",
                "Do you focus more on technical or physical training?",
            ],
        ));
    }

    if contains_any(lower, &["player", "performance", "skill"]) {
        return Some(template(
            format!(
                "Player development is crucial for team success! {}Every player has unique attributes that can \
                 be maximized through targeted training. I always recommend focusing on a player's natural \
                 strengths while gradually improving their weaker areas. Individual development plans work best \
                 when they align with the team's tactical system. Which players or positions are you most \
                 concerned about?",
                lead("As we've been discussing, ")
            ),
            82,
            &["Individual training plans", "Position-specific advice", "Skill assessment"],
            &[
                "What position needs the most improvement?",
                "Are there specific technical skills to work on?",
                "How do you currently assess player performance?",
            ],
        ));
    }

    if contains_any(lower, &["match", "game", "opponent"]) {
        return Some(template(
            format!(
                "Match preparation is where tactics come to life! {}Successful teams analyze their opponents \
                 thoroughly and adapt their game plan accordingly. This includes studying the opponent's \
                 formation, key players, set piece tendencies, and recent form. The best coaches prepare \
                 multiple tactical scenarios for different match situations. What specific match situation \
                 would you like to prepare for?",
                lead("Building on our tactical discussion, ")
            ),
            87,
            &["Pre-match analysis", "In-game adjustments", "Set piece strategies"],
            &[
                "What's your next opponent's playing style?",
                "Do you need help with substitution timing?",
                "How do you handle pressure situations?",
            ],
        ));
    }

    None
}

fn suggestions_for(intent: Option<&str>) -> Vec<String> {
    let items: &[&str] = match intent {
        Some("player_info") => &["Tell me about our top scorer", "Who has the most assists?", "Show me player fitness levels"],
        Some("team_info") => &["What's our current formation?", "How are we doing in the league?", "Team's recent form"],
        Some("match_info") => &["Last match analysis", "Next match details", "Head-to-head record"],
        Some("tactics") => &["Suggest a formation", "How to counter 4-3-3?", "Pressing strategies"],
        Some("training") => &["Possession drills", "Fitness training", "Set piece practice"],
        Some("analysis") => &["Team strengths", "Areas for improvement", "Data insights"],
        Some("prediction") => &["Match prediction", "Win probability", "Key factors"],
        Some("agent_action") => &["Add a new player", "Schedule a match", "Transfer a player"],
        _ => &["Analyze our formation", "Tactical advice", "Player performance"],
    };
    strings(items)
}

fn follow_ups_for(intent: Option<&str>) -> Vec<String> {
    let items: &[&str] = match intent {
        Some("player_info") => &["What are their strengths?", "How can they improve?", "Contract situation?"],
        Some("team_info") => &["Formation analysis?", "League position?", "Recent results?"],
        Some("match_info") => &["Tactical approach?", "Key players?", "Match prediction?"],
        Some("tactics") => &["Formation strengths?", "In-game adjustments?", "Opposition analysis?"],
        Some("training") => &["Specific drills?", "Training schedule?", "Skill development?"],
        Some("analysis") => &["Performance metrics?", "Comparative analysis?", "Recommendations?"],
        Some("prediction") => &["Factors affecting outcome?", "Player availability?", "Historical data?"],
        Some("agent_action") => &["What player position?", "What are the requirements?", "Budget considerations?"],
        _ => &["Tell me more", "What else can you help with?", "Any specific advice?"],
    };
    strings(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::cache::ManualClock;
    use serde_json::json;

    // Porta 9 (discard): conexão recusada na hora, backend "fora do ar".
    fn offline_service() -> AssistantService {
        let backend = AiBackendClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        AssistantService::with_retry(
            backend,
            RetryPolicy { attempts: 3, base_delay: Duration::from_millis(1) },
        )
    }

    fn request(message: &str, earlier: &[&str]) -> AssistantRequest {
        AssistantRequest {
            user_id: Uuid::new_v4(),
            message: message.to_string(),
            context: None,
            earlier: earlier.iter().map(|m| ChatMessage::user(*m)).collect(),
        }
    }

    #[test]
    fn memory_keeps_only_the_last_messages() {
        let memory = ConversationMemory::new(HISTORY_CAP);
        let user = Uuid::new_v4();
        for i in 0..60 {
            memory.push(user, ChatMessage::user(format!("msg {i}")));
        }
        let history = memory.history(user);
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].content, "msg 10");
        assert_eq!(history[49].content, "msg 59");

        memory.clear(user);
        assert!(memory.history(user).is_empty());
    }

    #[test]
    fn idle_conversations_are_dropped() {
        let clock = ManualClock::new();
        let memory = ConversationMemory::with_clock(HISTORY_CAP, Duration::from_secs(600), Arc::new(clock.clone()));
        let (ana, bia) = (Uuid::new_v4(), Uuid::new_v4());
        memory.push(ana, ChatMessage::user("hello"));
        memory.push(bia, ChatMessage::user("hi"));
        assert_eq!(memory.len(), 2);

        clock.advance(Duration::from_secs(400));
        memory.push(bia, ChatMessage::user("still here"));
        clock.advance(Duration::from_secs(300));

        assert!(memory.history(ana).is_empty());
        assert_eq!(memory.history(bia).len(), 2);

        memory.push(Uuid::new_v4(), ChatMessage::user("new"));
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn validity_rejects_error_phrases_and_blank_content() {
        let mut r = response_from_backend(&json!({ "response": "Play a 4-4-2." }));
        assert!(is_valid_response(&r));

        r.content = "We have technical difficulties".into();
        assert!(!is_valid_response(&r));

        r.content = "   ".into();
        assert!(!is_valid_response(&r));

        r.content = "ok".into();
        r.confidence = 0;
        assert!(!is_valid_response(&r));
    }

    #[test]
    fn backend_json_falls_back_to_intent_defaults() {
        let r = response_from_backend(&json!({ "content": "Pressing works.", "intent": "tactics" }));
        assert_eq!(r.content, "Pressing works.");
        assert_eq!(r.confidence, 95);
        assert_eq!(r.suggestions[0], "Suggest a formation");
        assert_eq!(r.follow_up_questions[0], "Formation strengths?");
        assert_eq!(r.intent.as_deref(), Some("tactics"));
    }

    #[test]
    fn enhance_adds_greeting_help_and_closing_question() {
        let base = AiResponse {
            content: "Use wingers".into(),
            confidence: 93,
            suggestions: vec![],
            follow_up_questions: vec![],
            intent: None,
            entities: None,
        };
        let out = enhance_response(base, "please help with wingers", true);
        assert_eq!(
            out.content,
            "I'm here to help! Hello! Use wingers. What would you like to know more about?"
        );
        assert_eq!(out.confidence, 95);
    }

    #[test]
    fn enhance_is_quiet_later_in_the_conversation() {
        let base = AiResponse {
            content: "Use wingers.".into(),
            confidence: 80,
            suggestions: vec![],
            follow_up_questions: vec![],
            intent: None,
            entities: None,
        };
        let out = enhance_response(base, "wingers?", false);
        assert_eq!(out.content, "Use wingers.");
        assert_eq!(out.confidence, 85);
    }

    #[tokio::test]
    async fn keyword_strategy_picks_template_by_priority() {
        let outcome = KeywordTemplateStrategy.attempt(&request("Should I add a striker to my formation?", &[])).await;
        match outcome {
            Outcome::Degraded(r) => {
                assert_eq!(r.confidence, 90);
                assert!(r.content.starts_with("I can help you with team management tasks!"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn keyword_strategy_uses_follow_up_phrasing() {
        let outcome = KeywordTemplateStrategy
            .attempt(&request("what tactic now?", &["we talked about tactics"]))
            .await;
        let r = outcome.into_value().unwrap();
        assert!(r.content.contains("Building on our previous discussion"));
        assert_eq!(r.confidence, 88);
    }

    #[tokio::test]
    async fn keyword_strategy_skips_non_football_messages() {
        let outcome = KeywordTemplateStrategy.attempt(&request("what's the weather like", &[])).await;
        assert!(matches!(outcome, Outcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn offline_backend_falls_back_to_templates() {
        let service = offline_service();
        let user = Uuid::new_v4();

        let reply = service.process_message(user, "Which training drills work best?", None).await;
        assert_eq!(reply.source, "keyword_templates");
        assert!(reply.degraded);
        assert_eq!(reply.response.confidence, 85);

        let history = service.history(user);
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn offline_backend_without_keywords_uses_generic() {
        let service = offline_service();
        let reply = service.process_message(Uuid::new_v4(), "hello there", None).await;
        assert_eq!(reply.source, "generic");
        assert_eq!(reply.response.confidence, 75);
        assert!(reply.response.content.contains("\"hello there\""));
    }

    #[tokio::test]
    async fn blank_message_gets_helpful_response_without_history() {
        let service = offline_service();
        let user = Uuid::new_v4();
        let reply = service.process_message(user, "   ", None).await;
        assert_eq!(reply.response.confidence, 85);
        assert!(service.history(user).is_empty());
    }

    #[tokio::test]
    async fn load_team_data_gives_up_after_retries() {
        let service = offline_service();
        let result = service.load_team_data(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[test]
    fn recovery_response_quotes_the_message() {
        let r = recovery_response("formation help");
        assert_eq!(r.confidence, 60);
        assert!(r.content.contains("You asked about: \"formation help\"."));
        assert!(r.content.ends_with("A balanced approach often works best."));
    }
}
