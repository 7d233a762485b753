//! Write operations for the employee graph.
//!
//! Every mutation runs in its own write transaction. Update and delete check
//! existence and mutate inside that same transaction.

use neo4rs::query;

use staffgraph_core::{EmployeeInput, NodeId};

use crate::client::{Access, GraphClient, GraphError, GraphTxn};
use crate::queries::{employee_exists, managed_departments};

/// Statements that build the demonstration dataset, in order.
const SEED_STATEMENTS: [&str; 4] = [
    "CREATE (:Employee)
     CREATE (:Department)
     CREATE (:Employee)-[:WORKS_IN]->(:Department)
     CREATE (:Employee)-[:MANAGES]->(:Department)",
    "CREATE (:Employee {name: 'John Doe', position: 'Manager'})",
    "CREATE (:Department {name: 'Marketing'})",
    "MATCH (e:Employee), (d:Department)
     WHERE e.name = 'John Doe' AND d.name = 'Marketing'
     CREATE (e)-[:WORKS_IN]->(d)",
];

impl GraphClient {
    // ── Seed ─────────────────────────────────────────────────────

    /// Populate the demonstration dataset. Not idempotent.
    pub async fn seed(&self) -> Result<(), GraphError> {
        let mut txn = self.begin(Access::Write).await?;
        let outcome = seed_in(&mut txn).await;
        txn.finish(outcome).await?;
        tracing::info!("Seeded demonstration dataset");
        Ok(())
    }

    // ── Employee Writes ──────────────────────────────────────────

    /// Create an Employee with exactly `name` and `position`, unattached.
    pub async fn create_employee(&self, input: &EmployeeInput) -> Result<(), GraphError> {
        input.validate()?;

        let q = query("CREATE (:Employee {name: $name, position: $position})")
            .param("name", input.name.clone())
            .param("position", input.position.clone());

        let mut txn = self.begin(Access::Write).await?;
        let outcome = txn.run(q).await;
        txn.finish(outcome).await?;
        tracing::debug!(name = %input.name, "Created employee");
        Ok(())
    }

    /// Overwrite both attributes of an existing Employee.
    ///
    /// Returns the applied values, or `NotFound` without touching the graph.
    pub async fn update_employee(
        &self,
        id: NodeId,
        input: &EmployeeInput,
    ) -> Result<EmployeeInput, GraphError> {
        input.validate()?;

        let mut txn = self.begin(Access::Write).await?;
        let outcome = update_in(&mut txn, id, input).await;
        txn.finish(outcome).await
    }

    /// Delete an Employee, cascading to the department it manages.
    ///
    /// A non-manager is detach-deleted alone. A manager is detach-deleted
    /// together with every department it MANAGES; that department's staff
    /// lose their WORKS_IN edge but are kept.
    pub async fn delete_employee(&self, id: NodeId) -> Result<NodeId, GraphError> {
        let mut txn = self.begin(Access::Write).await?;
        let outcome = delete_in(&mut txn, id).await;
        txn.finish(outcome).await
    }
}

async fn seed_in(txn: &mut GraphTxn) -> Result<(), GraphError> {
    for statement in SEED_STATEMENTS {
        txn.run(query(statement)).await?;
    }
    Ok(())
}

async fn update_in(
    txn: &mut GraphTxn,
    id: NodeId,
    input: &EmployeeInput,
) -> Result<EmployeeInput, GraphError> {
    if !employee_exists(txn, id).await? {
        tracing::warn!(employee_id = %id, "Update of missing employee");
        return Err(GraphError::NotFound {
            label: "Employee",
            id,
        });
    }

    let q = query(
        "MATCH (e:Employee)
         WHERE id(e) = $id
         SET e.name = $name, e.position = $position",
    )
    .param("id", id.raw())
    .param("name", input.name.clone())
    .param("position", input.position.clone());

    txn.run(q).await?;
    tracing::debug!(employee_id = %id, "Updated employee");
    Ok(input.clone())
}

async fn delete_in(txn: &mut GraphTxn, id: NodeId) -> Result<NodeId, GraphError> {
    if !employee_exists(txn, id).await? {
        tracing::warn!(employee_id = %id, "Delete of missing employee");
        return Err(GraphError::NotFound {
            label: "Employee",
            id,
        });
    }

    let managed = managed_departments(txn, id).await?;
    let cypher = if managed.is_empty() {
        "MATCH (e:Employee)
         WHERE id(e) = $id
         DETACH DELETE e"
    } else {
        "MATCH (e:Employee)-[:MANAGES]->(d:Department)
         WHERE id(e) = $id
         DETACH DELETE e, d"
    };
    let q = query(cypher).param("id", id.raw());

    txn.run(q).await?;
    tracing::info!(
        employee_id = %id,
        cascaded_departments = managed.len(),
        "Deleted employee"
    );
    Ok(id)
}
