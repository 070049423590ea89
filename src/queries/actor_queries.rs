use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};

use super::Query;
use crate::entities::{actor, film, film_actor, inventory, rental};
use crate::errors::ServiceError;

/// One row of the top-five actors report.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct TopActor {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub film_count: i64,
}

/// The five actors appearing in the most films, ties broken by last name.
#[derive(Debug, Serialize, Deserialize)]
pub struct TopFiveActorsQuery;

#[async_trait]
impl Query for TopFiveActorsQuery {
    type Result = Vec<TopActor>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        actor::Entity::find()
            .join(JoinType::InnerJoin, actor::Relation::FilmActor.def())
            .select_only()
            .column_as(actor::Column::ActorId, "actor_id")
            .column_as(actor::Column::FirstName, "first_name")
            .column_as(actor::Column::LastName, "last_name")
            .column_as(
                Expr::col((film_actor::Entity, film_actor::Column::FilmId)).count(),
                "film_count",
            )
            .group_by(actor::Column::ActorId)
            .order_by_desc(Expr::col(Alias::new("film_count")))
            .order_by_asc(actor::Column::LastName)
            .limit(5)
            .into_model::<TopActor>()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

#[derive(Debug, Serialize)]
pub struct ActorSummary {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ActorTopFilm {
    pub title: String,
    pub rentals: i64,
}

/// Actor detail payload: the actor row plus their five most-rented films.
#[derive(Debug, Serialize)]
pub struct ActorDetail {
    pub actor: ActorSummary,
    pub top_films: Vec<ActorTopFilm>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActorDetailQuery {
    pub actor_id: i32,
}

#[async_trait]
impl Query for ActorDetailQuery {
    type Result = ActorDetail;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let actor_row = actor::Entity::find_by_id(self.actor_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Actor not found".to_string()))?;

        let top_films = film::Entity::find()
            .join(JoinType::InnerJoin, film::Relation::FilmActor.def())
            .filter(film_actor::Column::ActorId.eq(self.actor_id))
            .join(JoinType::InnerJoin, film::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Rental.def())
            .select_only()
            .column_as(film::Column::Title, "title")
            .column_as(
                Expr::col((rental::Entity, rental::Column::RentalId)).count(),
                "rentals",
            )
            .group_by(film::Column::FilmId)
            .group_by(film::Column::Title)
            .order_by_desc(Expr::col(Alias::new("rentals")))
            .order_by_asc(film::Column::Title)
            .limit(5)
            .into_model::<ActorTopFilm>()
            .all(db)
            .await?;

        Ok(ActorDetail {
            actor: ActorSummary {
                actor_id: actor_row.actor_id,
                first_name: actor_row.first_name,
                last_name: actor_row.last_name,
            },
            top_films,
        })
    }
}
