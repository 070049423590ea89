use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};

use super::{page_offset, Query, PAGE_SIZE};
use crate::entities::{actor, category, film, film_actor, film_category, inventory, rental};
use crate::errors::ServiceError;

/// One row of the top-five films report.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct TopFilm {
    pub title: String,
    pub rating: Option<String>,
    pub length: Option<i16>,
    pub release_year: Option<i16>,
    pub description: Option<String>,
    pub language_id: i16,
    pub replacement_cost: f64,
    pub rental_rate: f64,
    pub special_features: Option<String>,
    pub rentals: i64,
}

/// The five most-rented films, ties broken by title.
#[derive(Debug, Serialize, Deserialize)]
pub struct TopFiveFilmsQuery;

#[async_trait]
impl Query for TopFiveFilmsQuery {
    type Result = Vec<TopFilm>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        film::Entity::find()
            .join(JoinType::InnerJoin, film::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Rental.def())
            .select_only()
            .column_as(film::Column::Title, "title")
            .column_as(film::Column::Rating, "rating")
            .column_as(film::Column::Length, "length")
            .column_as(film::Column::ReleaseYear, "release_year")
            .column_as(film::Column::Description, "description")
            .column_as(film::Column::LanguageId, "language_id")
            .column_as(
                Expr::col((film::Entity, film::Column::ReplacementCost))
                    .cast_as(Alias::new("double")),
                "replacement_cost",
            )
            .column_as(
                Expr::col((film::Entity, film::Column::RentalRate)).cast_as(Alias::new("double")),
                "rental_rate",
            )
            .column_as(film::Column::SpecialFeatures, "special_features")
            .column_as(
                Expr::col((rental::Entity, rental::Column::RentalId)).count(),
                "rentals",
            )
            .group_by(film::Column::FilmId)
            .order_by_desc(Expr::col(Alias::new("rentals")))
            .order_by_asc(film::Column::Title)
            .limit(5)
            .into_model::<TopFilm>()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

/// Film detail payload: the film row enriched with its category and
/// lifetime rental count, plus the cast list.
#[derive(Debug, Serialize)]
pub struct FilmDetail {
    pub film: FilmInfo,
    pub actors: Vec<CastMember>,
}

#[derive(Debug, Serialize)]
pub struct FilmInfo {
    pub film_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i16>,
    pub language_id: i16,
    pub rental_rate: f64,
    pub replacement_cost: f64,
    pub length: Option<i16>,
    pub rating: Option<String>,
    pub special_features: Option<String>,
    pub category: Option<String>,
    pub rentals: u64,
}

#[derive(Debug, Serialize)]
pub struct CastMember {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilmDetailQuery {
    pub film_id: i32,
}

#[async_trait]
impl Query for FilmDetailQuery {
    type Result = FilmDetail;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let film_row = film::Entity::find_by_id(self.film_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Film not found".to_string()))?;

        let category_row = category::Entity::find()
            .join(JoinType::InnerJoin, category::Relation::FilmCategory.def())
            .filter(film_category::Column::FilmId.eq(self.film_id))
            .one(db)
            .await?;

        let cast = actor::Entity::find()
            .join(JoinType::InnerJoin, actor::Relation::FilmActor.def())
            .filter(film_actor::Column::FilmId.eq(self.film_id))
            .order_by_asc(actor::Column::LastName)
            .order_by_asc(actor::Column::FirstName)
            .all(db)
            .await?;

        let rentals = rental::Entity::find()
            .join(JoinType::InnerJoin, rental::Relation::Inventory.def())
            .filter(inventory::Column::FilmId.eq(self.film_id))
            .count(db)
            .await?;

        Ok(FilmDetail {
            film: FilmInfo {
                film_id: film_row.film_id,
                title: film_row.title,
                description: film_row.description,
                release_year: film_row.release_year,
                language_id: film_row.language_id,
                rental_rate: film_row.rental_rate.to_f64().unwrap_or_default(),
                replacement_cost: film_row.replacement_cost.to_f64().unwrap_or_default(),
                length: film_row.length,
                rating: film_row.rating,
                special_features: film_row.special_features,
                category: category_row.map(|c| c.name),
                rentals,
            },
            actors: cast
                .into_iter()
                .map(|a| CastMember {
                    actor_id: a.actor_id,
                    first_name: a.first_name,
                    last_name: a.last_name,
                })
                .collect(),
        })
    }
}

/// One row of the films listing.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct FilmRow {
    pub film_id: i32,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct FilmsPage {
    pub current_page: u64,
    pub films_per_page: u64,
    pub total: i64,
    pub films: Vec<FilmRow>,
}

/// Paginated films listing; the optional search term matches title,
/// category, and cast names, case-insensitively.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilmsTableQuery {
    pub page: u64,
    pub search: Option<String>,
}

impl FilmsTableQuery {
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[async_trait]
impl Query for FilmsTableQuery {
    type Result = FilmsPage;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let page = self.page.max(1);

        let mut rows = film::Entity::find()
            .join(JoinType::InnerJoin, film::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Category.def());
        let mut count = rows.clone();

        if let Some(term) = self.search_term() {
            // Actor joins are LEFT so a title match still surfaces films
            // with no recorded cast.
            rows = rows
                .join(JoinType::LeftJoin, film::Relation::FilmActor.def())
                .join(JoinType::LeftJoin, film_actor::Relation::Actor.def())
                .filter(film_search_condition(term));
            count = count
                .join(JoinType::LeftJoin, film::Relation::FilmActor.def())
                .join(JoinType::LeftJoin, film_actor::Relation::Actor.def())
                .filter(film_search_condition(term));
        }

        let films = rows
            .select_only()
            .column_as(film::Column::FilmId, "film_id")
            .column_as(film::Column::Title, "title")
            .column_as(Expr::col((category::Entity, category::Column::Name)), "category")
            .group_by(film::Column::FilmId)
            .group_by(film::Column::Title)
            .group_by(Expr::col((category::Entity, category::Column::Name)))
            .order_by_asc(film::Column::FilmId)
            .limit(PAGE_SIZE)
            .offset(page_offset(page))
            .into_model::<FilmRow>()
            .all(db)
            .await?;

        let total: i64 = count
            .select_only()
            .column_as(Expr::cust("COUNT(DISTINCT film.film_id)"), "total")
            .into_tuple::<i64>()
            .one(db)
            .await?
            .unwrap_or(0);

        Ok(FilmsPage {
            current_page: page,
            films_per_page: PAGE_SIZE,
            total,
            films,
        })
    }
}

// LIKE is case-insensitive under both the MySQL default collation and
// SQLite's ASCII rules, which is the substring-match contract here.
fn film_search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term);
    Condition::any()
        .add(film::Column::Title.like(pattern.clone()))
        .add(category::Column::Name.like(pattern.clone()))
        .add(actor::Column::FirstName.like(pattern.clone()))
        .add(actor::Column::LastName.like(pattern))
}
