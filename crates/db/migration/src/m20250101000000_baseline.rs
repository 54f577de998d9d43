use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(schools_table(manager.get_database_backend()))
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_schools_city")
                    .table(Schools::Table)
                    .col(Schools::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn schools_table(backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .if_not_exists()
        .table(Schools::Table)
        .col(pk_id_col(backend, Schools::Id))
        .col(ColumnDef::new(Schools::Name).string().not_null())
        .col(ColumnDef::new(Schools::Address).text().not_null())
        .col(ColumnDef::new(Schools::City).string().not_null())
        .col(ColumnDef::new(Schools::State).string().not_null())
        .col(ColumnDef::new(Schools::Contact).string_len(10).not_null())
        .col(ColumnDef::new(Schools::Image).string())
        .col(ColumnDef::new(Schools::EmailId).string().not_null())
        .col(timestamp_col(Schools::CreatedAt))
        .to_owned()
}

fn pk_id_col<T: Iden>(backend: DatabaseBackend, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match backend {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

/// Zoned so the column decodes as `DateTime<Utc>` on every backend.
fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Schools {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Contact,
    Image,
    EmailId,
    CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_is_zoned_on_postgres() {
        let sql = schools_table(DatabaseBackend::Postgres).to_string(PostgresQueryBuilder);

        assert!(sql.contains(r#""created_at" timestamp with time zone NOT NULL"#), "{sql}");
        assert!(sql.contains(r#""id" bigserial"#) || sql.contains("bigint"), "{sql}");
    }

    #[test]
    fn sqlite_keys_use_integer_rowid() {
        let sql = schools_table(DatabaseBackend::Sqlite).to_string(SqliteQueryBuilder);

        assert!(sql.contains(r#""id" integer NOT NULL PRIMARY KEY AUTOINCREMENT"#), "{sql}");
    }
}
