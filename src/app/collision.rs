// Collision decision - One policy per batch

use std::path::PathBuf;

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::{CollisionPolicy, ConflictChoice};
use crate::ports::ConflictPromptPort;

/// Decide the batch policy from the prospective outputs that already exist.
///
/// Without conflicts the policy is irrelevant and `keep-both` is returned
/// without asking. A preset choice is used as is; `prompt` asks exactly once.
pub async fn decide_policy(
    choice: ConflictChoice,
    conflicts: &[PathBuf],
    prompt: &dyn ConflictPromptPort,
) -> Result<CollisionPolicy, DomainError> {
    if conflicts.is_empty() {
        return Ok(CollisionPolicy::KeepBoth);
    }

    let policy = match choice.preset() {
        Some(policy) => policy,
        None => prompt.choose_policy(conflicts).await?,
    };
    info!(
        "{} output file(s) already exist, using policy {:?}",
        conflicts.len(),
        policy
    );
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPrompt {
        answer: CollisionPolicy,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ConflictPromptPort for CountingPrompt {
        async fn choose_policy(
            &self,
            _conflicts: &[PathBuf],
        ) -> Result<CollisionPolicy, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    fn prompt(answer: CollisionPolicy) -> CountingPrompt {
        CountingPrompt {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_no_conflicts_never_prompts() {
        let p = prompt(CollisionPolicy::Overwrite);
        let policy = decide_policy(ConflictChoice::Prompt, &[], &p).await.unwrap();
        assert_eq!(policy, CollisionPolicy::KeepBoth);
        assert_eq!(p.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_asked_once() {
        let p = prompt(CollisionPolicy::Overwrite);
        let conflicts = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let policy = decide_policy(ConflictChoice::Prompt, &conflicts, &p).await.unwrap();
        assert_eq!(policy, CollisionPolicy::Overwrite);
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preset_skips_prompt() {
        let p = prompt(CollisionPolicy::Overwrite);
        let conflicts = vec![PathBuf::from("a.png")];
        let policy = decide_policy(ConflictChoice::KeepBoth, &conflicts, &p).await.unwrap();
        assert_eq!(policy, CollisionPolicy::KeepBoth);
        assert_eq!(p.calls.load(Ordering::SeqCst), 0);
    }
}
