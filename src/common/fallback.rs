// src/common/fallback.rs

use async_trait::async_trait;

/// Resultado de uma estratégia da cadeia de degradação.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// A fonte principal respondeu corretamente.
    Success(T),
    /// Resposta utilizável, mas vinda de uma fonte de reserva.
    Degraded(T),
    /// A estratégia não conseguiu responder; passa para a próxima.
    Unavailable(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(v) | Outcome::Degraded(v) => Some(v),
            Outcome::Unavailable(_) => None,
        }
    }
}

#[async_trait]
pub trait Strategy<Req, T>: Send + Sync
where
    Req: Sync,
    T: Send,
{
    fn name(&self) -> &'static str;

    async fn attempt(&self, request: &Req) -> Outcome<T>;
}

/// Qual estratégia respondeu, e como.
#[derive(Debug)]
pub struct Resolution<T> {
    pub strategy: &'static str,
    pub outcome: Outcome<T>,
}

/// Lista ordenada de estratégias, avaliadas até a primeira que responde.
pub struct FallbackChain<Req, T> {
    strategies: Vec<Box<dyn Strategy<Req, T>>>,
}

impl<Req, T> FallbackChain<Req, T>
where
    Req: Sync,
    T: Send,
{
    pub fn new() -> Self {
        Self { strategies: Vec::new() }
    }

    pub fn with(mut self, strategy: impl Strategy<Req, T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Retorna `None` quando todas as estratégias estão indisponíveis.
    pub async fn resolve(&self, request: &Req) -> Option<Resolution<T>> {
        for strategy in &self.strategies {
            match strategy.attempt(request).await {
                Outcome::Unavailable(reason) => {
                    tracing::debug!(strategy = strategy.name(), %reason, "estratégia indisponível");
                }
                outcome => {
                    return Some(Resolution { strategy: strategy.name(), outcome });
                }
            }
        }
        None
    }
}

impl<Req, T> Default for FallbackChain<Req, T>
where
    Req: Sync,
    T: Send,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Outcome<u32>);

    #[async_trait]
    impl Strategy<(), u32> for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn attempt(&self, _request: &()) -> Outcome<u32> {
            self.1.clone()
        }
    }

    #[tokio::test]
    async fn skips_unavailable_strategies_in_order() {
        let chain = FallbackChain::new()
            .with(Fixed("first", Outcome::Unavailable("down".into())))
            .with(Fixed("second", Outcome::Degraded(2)))
            .with(Fixed("third", Outcome::Success(3)));

        let resolution = chain.resolve(&()).await.expect("some strategy answers");
        assert_eq!(resolution.strategy, "second");
        assert_eq!(resolution.outcome, Outcome::Degraded(2));
    }

    #[tokio::test]
    async fn none_when_everything_is_unavailable() {
        let chain = FallbackChain::new()
            .with(Fixed("a", Outcome::Unavailable("x".into())))
            .with(Fixed("b", Outcome::Unavailable("y".into())));
        assert!(chain.resolve(&()).await.is_none());
        assert_eq!(chain.names(), vec!["a", "b"]);
    }

    #[test]
    fn into_value_drops_unavailable() {
        assert_eq!(Outcome::Success(1).into_value(), Some(1));
        assert_eq!(Outcome::Degraded(1).into_value(), Some(1));
        assert_eq!(Outcome::<u32>::Unavailable("n".into()).into_value(), None);
    }
}
