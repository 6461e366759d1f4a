//! Postgres-backed store
//!
//! Status and type columns are stored as text and parsed on the way out;
//! a row that no longer parses surfaces as [`StoreError::Decode`] instead
//! of silently changing meaning.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    CargoWithVehicle, NewCargo, NewVehicle, Store, StoreError, VehicleWithCargos,
};
use crate::domain::{Cargo, Vehicle};
use crate::filter::Predicate;

const CARGO_COLUMNS: &str = "c.id, c.vehicle_id, c.description, c.weight, c.status, \
                             v.vehicle_type, v.vehicle_number, v.route_from, v.route_to";

/// Production [`Store`] over a connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: i64,
    vehicle_type: String,
    vehicle_number: String,
    route_from: String,
    route_to: String,
}

#[derive(sqlx::FromRow)]
struct CargoRow {
    id: i64,
    vehicle_id: i64,
    description: String,
    weight: f64,
    status: String,
}

#[derive(sqlx::FromRow)]
struct CargoVehicleRow {
    id: i64,
    vehicle_id: i64,
    description: String,
    weight: f64,
    status: String,
    vehicle_type: String,
    vehicle_number: String,
    route_from: String,
    route_to: String,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = StoreError;

    fn try_from(row: VehicleRow) -> Result<Self, StoreError> {
        Ok(Vehicle {
            id: row.id,
            vehicle_type: row
                .vehicle_type
                .parse()
                .map_err(|e| StoreError::Decode(format!("vehicle {}: {e}", row.id)))?,
            vehicle_number: row.vehicle_number,
            route_from: row.route_from,
            route_to: row.route_to,
        })
    }
}

impl TryFrom<CargoRow> for Cargo {
    type Error = StoreError;

    fn try_from(row: CargoRow) -> Result<Self, StoreError> {
        Ok(Cargo {
            id: row.id,
            vehicle_id: row.vehicle_id,
            description: row.description,
            weight: row.weight,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::Decode(format!("cargo {}: {e}", row.id)))?,
        })
    }
}

impl TryFrom<CargoVehicleRow> for CargoWithVehicle {
    type Error = StoreError;

    fn try_from(row: CargoVehicleRow) -> Result<Self, StoreError> {
        Ok(CargoWithVehicle {
            cargo: Cargo {
                id: row.id,
                vehicle_id: row.vehicle_id,
                description: row.description,
                weight: row.weight,
                status: row
                    .status
                    .parse()
                    .map_err(|e| StoreError::Decode(format!("cargo {}: {e}", row.id)))?,
            },
            vehicle: Vehicle {
                id: row.vehicle_id,
                vehicle_type: row
                    .vehicle_type
                    .parse()
                    .map_err(|e| StoreError::Decode(format!("vehicle {}: {e}", row.vehicle_id)))?,
                vehicle_number: row.vehicle_number,
                route_from: row.route_from,
                route_to: row.route_to,
            },
        })
    }
}

/// Render a predicate as a SQL condition over the joined cargo/vehicle
/// relation, numbering placeholders from `*param` and pushing bind values
/// in placeholder order.
///
/// `None` means the predicate does not restrict the result set.
fn render_predicate(
    predicate: &Predicate,
    param: &mut usize,
    binds: &mut Vec<String>,
) -> Option<String> {
    match predicate {
        Predicate::All => None,
        Predicate::StatusIn(statuses) => Some(in_list(
            "c.status",
            statuses.iter().map(|s| s.as_str().to_string()),
            param,
            binds,
        )),
        Predicate::VehicleTypeIn(types) => Some(in_list(
            "v.vehicle_type",
            types.iter().map(|t| t.as_str().to_string()),
            param,
            binds,
        )),
        Predicate::And(children) => {
            let rendered: Vec<String> = children
                .iter()
                .filter_map(|child| render_predicate(child, param, binds))
                .collect();
            match rendered.len() {
                0 => None,
                1 => Some(rendered.into_iter().next().unwrap_or_default()),
                _ => Some(format!("({})", rendered.join(" AND "))),
            }
        },
        Predicate::Or(children) => {
            if children.iter().any(Predicate::is_unrestricted) {
                return None;
            }
            let mut rendered = Vec::with_capacity(children.len());
            for child in children {
                match render_predicate(child, param, binds) {
                    Some(clause) => rendered.push(clause),
                    // Unreachable after the is_unrestricted check above,
                    // but an always-true branch makes the whole OR true.
                    None => return None,
                }
            }
            match rendered.len() {
                0 => Some("FALSE".to_string()),
                1 => Some(rendered.into_iter().next().unwrap_or_default()),
                _ => Some(format!("({})", rendered.join(" OR "))),
            }
        },
    }
}

fn in_list(
    column: &str,
    values: impl Iterator<Item = String>,
    param: &mut usize,
    binds: &mut Vec<String>,
) -> String {
    let mut placeholders = Vec::new();
    for value in values {
        placeholders.push(format!("${param}"));
        *param += 1;
        binds.push(value);
    }
    if placeholders.is_empty() {
        // An empty membership list matches nothing.
        return "FALSE".to_string();
    }
    format!("{column} IN ({})", placeholders.join(", "))
}

fn push_where(sql: &mut String, clause: Option<String>) {
    if let Some(clause) = clause {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_cargo(&self, new: NewCargo) -> Result<Cargo, StoreError> {
        let row = sqlx::query_as::<_, CargoRow>(
            "INSERT INTO cargos (vehicle_id, description, weight, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, vehicle_id, description, weight, status",
        )
        .bind(new.vehicle_id)
        .bind(&new.description)
        .bind(new.weight)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn cargo_by_id(&self, id: i64) -> Result<Option<CargoWithVehicle>, StoreError> {
        let sql = format!(
            "SELECT {CARGO_COLUMNS} FROM cargos c \
             INNER JOIN vehicles v ON v.id = c.vehicle_id \
             WHERE c.id = $1"
        );
        let row = sqlx::query_as::<_, CargoVehicleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CargoWithVehicle::try_from).transpose()
    }

    async fn update_cargo(&self, id: i64, changes: NewCargo) -> Result<Option<Cargo>, StoreError> {
        let row = sqlx::query_as::<_, CargoRow>(
            "UPDATE cargos \
             SET vehicle_id = $2, description = $3, weight = $4, status = $5 \
             WHERE id = $1 \
             RETURNING id, vehicle_id, description, weight, status",
        )
        .bind(id)
        .bind(changes.vehicle_id)
        .bind(&changes.description)
        .bind(changes.weight)
        .bind(changes.status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cargo::try_from).transpose()
    }

    async fn delete_cargo(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cargos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_cargos(
        &self,
        predicate: &Predicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CargoWithVehicle>, StoreError> {
        let mut param = 1;
        let mut binds = Vec::new();
        let clause = render_predicate(predicate, &mut param, &mut binds);

        let mut sql = format!(
            "SELECT {CARGO_COLUMNS} FROM cargos c \
             INNER JOIN vehicles v ON v.id = c.vehicle_id"
        );
        push_where(&mut sql, clause);
        sql.push_str(&format!(" ORDER BY c.id LIMIT ${param} OFFSET ${}", param + 1));

        let mut query = sqlx::query_as::<_, CargoVehicleRow>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        rows.into_iter().map(CargoWithVehicle::try_from).collect()
    }

    async fn cargos_matching(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CargoWithVehicle>, StoreError> {
        let mut param = 1;
        let mut binds = Vec::new();
        let clause = render_predicate(predicate, &mut param, &mut binds);

        let mut sql = format!(
            "SELECT {CARGO_COLUMNS} FROM cargos c \
             INNER JOIN vehicles v ON v.id = c.vehicle_id"
        );
        push_where(&mut sql, clause);
        sql.push_str(" ORDER BY c.id");

        let mut query = sqlx::query_as::<_, CargoVehicleRow>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter().map(CargoWithVehicle::try_from).collect()
    }

    async fn count_cargos(&self, predicate: &Predicate) -> Result<i64, StoreError> {
        let mut param = 1;
        let mut binds = Vec::new();
        let clause = render_predicate(predicate, &mut param, &mut binds);

        let mut sql = String::from(
            "SELECT COUNT(*) FROM cargos c \
             INNER JOIN vehicles v ON v.id = c.vehicle_id",
        );
        push_where(&mut sql, clause);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn save_vehicle(&self, new: NewVehicle) -> Result<Vehicle, StoreError> {
        let result = sqlx::query_as::<_, VehicleRow>(
            "INSERT INTO vehicles (vehicle_type, vehicle_number, route_from, route_to) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, vehicle_type, vehicle_number, route_from, route_to",
        )
        .bind(new.vehicle_type.as_str())
        .bind(&new.vehicle_number)
        .bind(&new.route_from)
        .bind(&new.route_to)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => row.try_into(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateVehicleNumber(new.vehicle_number))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn vehicle_by_id(&self, id: i64) -> Result<Option<Vehicle>, StoreError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            "SELECT id, vehicle_type, vehicle_number, route_from, route_to \
             FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn vehicle_by_number(&self, number: &str) -> Result<Option<Vehicle>, StoreError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            "SELECT id, vehicle_type, vehicle_number, route_from, route_to \
             FROM vehicles WHERE vehicle_number = $1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn list_vehicles(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VehicleWithCargos>, StoreError> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT id, vehicle_type, vehicle_number, route_from, route_to \
             FROM vehicles ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let vehicles: Vec<Vehicle> = rows
            .into_iter()
            .map(Vehicle::try_from)
            .collect::<Result<_, _>>()?;
        if vehicles.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = vehicles.iter().map(|v| v.id).collect();
        let cargo_rows = sqlx::query_as::<_, CargoRow>(
            "SELECT id, vehicle_id, description, weight, status \
             FROM cargos WHERE vehicle_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_vehicle: HashMap<i64, Vec<Cargo>> = HashMap::new();
        for row in cargo_rows {
            let cargo = Cargo::try_from(row)?;
            by_vehicle.entry(cargo.vehicle_id).or_default().push(cargo);
        }

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let cargos = by_vehicle.remove(&vehicle.id).unwrap_or_default();
                VehicleWithCargos { vehicle, cargos }
            })
            .collect())
    }

    async fn count_vehicles(&self) -> Result<i64, StoreError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_vehicle(
        &self,
        id: i64,
        changes: NewVehicle,
    ) -> Result<Option<Vehicle>, StoreError> {
        let result = sqlx::query_as::<_, VehicleRow>(
            "UPDATE vehicles \
             SET vehicle_type = $2, vehicle_number = $3, route_from = $4, route_to = $5 \
             WHERE id = $1 \
             RETURNING id, vehicle_type, vehicle_number, route_from, route_to",
        )
        .bind(id)
        .bind(changes.vehicle_type.as_str())
        .bind(&changes.vehicle_number)
        .bind(&changes.route_from)
        .bind(&changes.route_to)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => row.map(Vehicle::try_from).transpose(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateVehicleNumber(changes.vehicle_number))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_vehicle(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(StoreError::VehicleInUse(id))
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryStatus, VehicleType};

    fn render(predicate: &Predicate) -> (Option<String>, Vec<String>) {
        let mut param = 1;
        let mut binds = Vec::new();
        let clause = render_predicate(predicate, &mut param, &mut binds);
        (clause, binds)
    }

    #[test]
    fn test_unrestricted_predicate_renders_no_clause() {
        let (clause, binds) = render(&Predicate::All);
        assert_eq!(clause, None);
        assert!(binds.is_empty());
    }

    #[test]
    fn test_status_list_renders_numbered_placeholders() {
        let predicate = Predicate::StatusIn(vec![
            DeliveryStatus::Pending,
            DeliveryStatus::Delivered,
        ]);
        let (clause, binds) = render(&predicate);
        assert_eq!(clause.as_deref(), Some("c.status IN ($1, $2)"));
        assert_eq!(binds, vec!["PENDING".to_string(), "DELIVERED".to_string()]);
    }

    #[test]
    fn test_conjunction_numbers_params_across_fields() {
        let predicate = Predicate::StatusIn(vec![DeliveryStatus::Lost])
            .and(Predicate::VehicleTypeIn(vec![VehicleType::Ship, VehicleType::Plane]));
        let (clause, binds) = render(&predicate);
        assert_eq!(
            clause.as_deref(),
            Some("(c.status IN ($1) AND v.vehicle_type IN ($2, $3))")
        );
        assert_eq!(binds, vec!["LOST".to_string(), "SHIP".to_string(), "PLANE".to_string()]);
    }

    #[test]
    fn test_disjunction_renders_parenthesized_or() {
        let predicate = Predicate::Or(vec![
            Predicate::StatusIn(vec![DeliveryStatus::Returned]),
            Predicate::VehicleTypeIn(vec![VehicleType::Drone]),
        ]);
        let (clause, _) = render(&predicate);
        assert_eq!(
            clause.as_deref(),
            Some("(c.status IN ($1) OR v.vehicle_type IN ($2))")
        );
    }

    #[test]
    fn test_disjunction_with_unrestricted_branch_is_unrestricted() {
        let predicate = Predicate::Or(vec![
            Predicate::All,
            Predicate::StatusIn(vec![DeliveryStatus::Lost]),
        ]);
        let (clause, binds) = render(&predicate);
        assert_eq!(clause, None);
        assert!(binds.is_empty());
    }

    #[test]
    fn test_empty_membership_list_matches_nothing() {
        let (clause, binds) = render(&Predicate::StatusIn(Vec::new()));
        assert_eq!(clause.as_deref(), Some("FALSE"));
        assert!(binds.is_empty());
    }

    #[test]
    fn test_conjunction_of_unrestricted_children_collapses() {
        let predicate = Predicate::And(vec![Predicate::All, Predicate::All]);
        let (clause, _) = render(&predicate);
        assert_eq!(clause, None);

        let single = Predicate::And(vec![
            Predicate::All,
            Predicate::StatusIn(vec![DeliveryStatus::InTransit]),
        ]);
        let (clause, binds) = render(&single);
        assert_eq!(clause.as_deref(), Some("c.status IN ($1)"));
        assert_eq!(binds, vec!["IN_TRANSIT".to_string()]);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_vehicle_round_trip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("../../migrations").run(&pool).await.expect("migrate");
        let store = PgStore::new(pool);

        let saved = store
            .save_vehicle(NewVehicle {
                vehicle_type: VehicleType::Train,
                vehicle_number: format!("RT{}", std::process::id()),
                route_from: "Kyiv".to_string(),
                route_to: "Kharkiv".to_string(),
            })
            .await
            .expect("save");

        let found = store
            .vehicle_by_number(&saved.vehicle_number)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found, saved);

        assert!(store.delete_vehicle(saved.id).await.expect("delete"));
    }
}
