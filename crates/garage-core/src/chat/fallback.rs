//! Keyword-matched canned answers used when the AI backend is unavailable.
//!
//! The message is lower-cased and checked against each group in order; the
//! first group with any keyword contained in the message wins. There is no
//! scoring.

/// A set of trigger keywords sharing one canned answer.
#[derive(Debug)]
pub struct KeywordGroup {
    pub topic: &'static str,
    /// Lower-case substrings; any one of them selects the group.
    pub keywords: &'static [&'static str],
    pub answer: &'static str,
}

impl KeywordGroup {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

pub const ENGINE_OIL_ANSWER: &str = "エンジンオイル交換について回答します：

一般的な交換頻度：
• 通常のエンジンオイル：5,000km または 6ヶ月
• 高性能合成オイル：10,000km または 12ヶ月
• 厳しい使用条件下：3,000-5,000km

交換時期の判断基準：
• オイルの色が黒く変色
• 粘度の低下
• 金属粉の混入
• 走行距離

定期的な交換により、エンジンの寿命を延ばし、燃費向上にもつながります。";

pub const BRAKE_ANSWER: &str = "ブレーキパッドの交換について説明します：

交換時期の目安：
• パッド厚：残り2-3mm以下
• 走行距離：20,000-40,000km（使用状況による）
• 異音：キーキー音やゴリゴリ音

点検ポイント：
• 目視でのパッド厚確認
• ブレーキフルードの汚れ
• ローターの摩耗状況
• ブレーキの効き具合

安全に直結する部品のため、定期点検を怠らないようにしましょう。";

pub const CVT_NOISE_ANSWER: &str = "CVTの異音について解説します：

主な異音の原因：
• CVTフルードの劣化・不足
• ベルトとプーリーの摩耗
• バルブボディの不具合
• 電子制御系の問題

診断手順：
1. CVTフルードレベル・状態確認
2. 診断機での故障コード確認
3. 路上テストでの症状確認
4. 内部点検（必要に応じて）

早期発見・対処により、大きな故障を防げます。";

pub const HYBRID_ANSWER: &str = "ハイブリッド車のメンテナンスについて：

特別な注意点：
• 高電圧システムの安全確保
• 駆動用バッテリーの状態監視
• 冷却システムの点検
• 回生ブレーキシステムの確認

メンテナンス項目：
• エンジンオイル（通常車と同様）
• ブレーキフルード
• 冷却水（エンジン・インバーター用）
• エアフィルター

専用診断機での定期チェックが重要です。";

pub const DIAGNOSTIC_ANSWER: &str = "診断機の効果的な使用方法：

基本手順：
1. 車両情報の正確な入力
2. 全システムスキャン実行
3. 故障コードの詳細確認
4. ライブデータの監視
5. アクチュエーターテスト

活用のコツ：
• 症状と故障コードの関連性確認
• 履歴データとの比較
• メーカー別の特殊機能活用
• 定期的なソフトウェア更新

診断機は故障の手がかりを提供するツールです。最終判断は技術者の経験と知識が重要です。";

pub const NO_START_ANSWER: &str = "症状：エンジン始動不良
考えられる原因：
• バッテリー上がり（最も一般的）
• セルモーターの故障
• 燃料系統の問題

診断手順：
1. バッテリー電圧をチェック（12.6V以上か確認）
2. セルモーターの回転音を確認
3. 燃料の臭いを確認

緊急度：高
概算費用：バッテリー交換 8,000円〜15,000円

注意事項：バッテリー端子は素手で触らず、ショートに注意してください。";

pub const AIR_CONDITIONING_ANSWER: &str = "症状：エアコン関連の問題
考えられる原因：
• 冷媒ガス不足
• コンプレッサーの故障
• エアコンフィルターの詰まり

診断手順：
1. エアコンフィルターの状態を確認
2. 冷風の温度をチェック
3. 異音の有無を確認

緊急度：低
概算費用：ガス補充 5,000円〜、フィルター交換 3,000円〜

注意事項：夏場の故障は熱中症のリスクがあります。早めの点検をお勧めします。";

pub const MENU_ANSWER: &str = "ご質問ありがとうございます。

自動車修理に関するご質問にお答えします。以下のような内容についてお気軽にお聞きください：

• エンジン関連（オイル交換、異音、不調など）
• ブレーキシステム（パッド交換、フルード交換など）
• トランスミッション（CVT、AT、MTの不具合）
• 電装系（バッテリー、オルタネーター、ECUなど）
• 診断・故障探求の方法
• 工場運営・業務改善

より具体的な症状や車種をお教えいただければ、詳しい回答ができます。

※このAIアシスタントは参考情報を提供します。実際の作業は安全を最優先に、適切な手順で行ってください。";

/// Keyword groups in priority order.
pub static KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        topic: "engine_oil",
        keywords: &["エンジンオイル", "オイル交換", "oil change", "engine oil"],
        answer: ENGINE_OIL_ANSWER,
    },
    KeywordGroup {
        topic: "brake",
        keywords: &["ブレーキ", "パッド", "brake"],
        answer: BRAKE_ANSWER,
    },
    KeywordGroup {
        topic: "cvt_noise",
        keywords: &["cvt", "異音"],
        answer: CVT_NOISE_ANSWER,
    },
    KeywordGroup {
        topic: "hybrid_battery",
        keywords: &["ハイブリッド", "バッテリー", "hybrid", "battery"],
        answer: HYBRID_ANSWER,
    },
    KeywordGroup {
        topic: "diagnostic_tool",
        keywords: &["診断機", "診断", "diagnostic", "scan tool"],
        answer: DIAGNOSTIC_ANSWER,
    },
    KeywordGroup {
        topic: "no_start",
        keywords: &["かからない", "始動", "won't start", "no start"],
        answer: NO_START_ANSWER,
    },
    KeywordGroup {
        topic: "air_conditioning",
        keywords: &["エアコン", "冷房", "air conditioning", "a/c"],
        answer: AIR_CONDITIONING_ANSWER,
    },
];

/// The first keyword group matching `message`, if any.
pub fn match_group(message: &str) -> Option<&'static KeywordGroup> {
    let lowered = message.to_lowercase();
    KEYWORD_GROUPS.iter().find(|g| g.matches(&lowered))
}

/// Canned answer for `message`, or the generic menu when nothing matches.
pub fn respond(message: &str) -> &'static str {
    match_group(message).map_or(MENU_ANSWER, |g| g.answer)
}
