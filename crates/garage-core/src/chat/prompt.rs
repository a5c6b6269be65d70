//! Prompt assembly for the automotive repair advisor.

/// Number of history lines forwarded to the model.
pub const HISTORY_WINDOW: usize = 5;

pub const SYSTEM_PROMPT: &str = "あなたは経験豊富な自動車整備士として、整備工場のプロフェッショナルからの質問に答えるアシスタントです。

回答の方針：
• 症状、考えられる原因、診断手順、緊急度、概算費用、注意事項の順に整理して回答する
• 安全に関わる内容（ブレーキ、ステアリング、高電圧系統など）は必ず注意喚起を含める
• 不確かな場合は推測であることを明示し、実車確認や専門業者への相談を勧める
• 日本語で、簡潔かつ実用的に回答する";

/// The trailing `HISTORY_WINDOW` entries of `history`, newline-joined.
pub fn recent_history(history: &[String]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..].join("\n")
}

/// Full prompt: persona, the question, then recent conversation.
pub fn build_prompt(message: &str, history: &[String]) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\n【質問】\n{message}\n\n【最近の会話履歴】\n{}\n\n上記に基づいて、専門的で実用的な回答をお願いします。",
        recent_history(history)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_recent_history_keeps_last_five() {
        assert_eq!(recent_history(&lines(7)), "line 3\nline 4\nline 5\nline 6\nline 7");
        assert_eq!(recent_history(&lines(2)), "line 1\nline 2");
        assert_eq!(recent_history(&[]), "");
    }

    #[test]
    fn test_prompt_contains_persona_question_and_history() {
        let prompt = build_prompt("ブレーキが鳴く", &lines(6));
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("【質問】\nブレーキが鳴く\n"));
        assert!(prompt.contains("line 6"));
        assert!(!prompt.contains("line 1\n"));
    }
}
