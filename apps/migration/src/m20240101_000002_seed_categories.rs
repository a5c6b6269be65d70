use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (name, slug, description)
const CATEGORIES: [(&str, &str, &str); 5] = [
    ("エンジン", "engine", "エンジン本体・オイル・冷却系の整備"),
    ("トランスミッション", "transmission", "AT・CVT・MTの不具合と整備"),
    ("電装系", "electrical", "バッテリー・ハイブリッド・配線トラブル"),
    ("故障診断", "diagnosis", "診断機の使い方と故障コードの読み方"),
    ("工場経営", "business", "整備工場の経営・集客・人材"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, slug, description) in CATEGORIES {
            db.execute_unprepared(&format!(
                "INSERT INTO categories (id, name, slug, description) \
                 VALUES (gen_random_uuid(), '{name}', '{slug}', '{description}') \
                 ON CONFLICT (slug) DO NOTHING"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = CATEGORIES
            .iter()
            .map(|(_, slug, _)| format!("'{slug}'"))
            .collect::<Vec<_>>()
            .join(", ");

        manager
            .get_connection()
            .execute_unprepared(&format!("DELETE FROM categories WHERE slug IN ({slugs})"))
            .await?;

        Ok(())
    }
}
