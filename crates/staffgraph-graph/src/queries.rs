//! Read operations against the employee graph.

use neo4rs::{query, Row};

use staffgraph_core::{Department, Employee, EmployeeSummary, NodeId};

use crate::client::{node_column, string_prop, Access, GraphClient, GraphError, GraphTxn};

impl GraphClient {
    // ── List Queries ─────────────────────────────────────────────

    /// List every Employee node.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, GraphError> {
        let mut txn = self.begin(Access::Read).await?;
        let outcome = list_employees_in(&mut txn).await;
        txn.finish(outcome).await
    }

    /// List every Department node.
    pub async fn list_departments(&self) -> Result<Vec<Department>, GraphError> {
        let mut txn = self.begin(Access::Read).await?;
        let outcome = list_departments_in(&mut txn).await;
        txn.finish(outcome).await
    }

    // ── Traversals ───────────────────────────────────────────────

    /// Employees working in the department managed by `manager_id`.
    ///
    /// Two hops: manager -[:MANAGES]-> department <-[:WORKS_IN]- staff.
    /// The id is the manager's, not the department's.
    pub async fn department_employees_by_manager(
        &self,
        manager_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        let q = query(
            "MATCH (m:Employee)-[:MANAGES]->(d:Department)<-[:WORKS_IN]-(e:Employee)
             WHERE id(m) = $id
             RETURN e",
        )
        .param("id", manager_id.raw());

        tracing::debug!(manager_id = %manager_id, "Fetching department employees by manager");
        let mut txn = self.begin(Access::Read).await?;
        let outcome = txn.rows(q).await.and_then(|rows| summaries(&rows));
        txn.finish(outcome).await
    }

    /// Employees whose WORKS_IN edge targets `department_id`.
    pub async fn department_members(
        &self,
        department_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        let q = query(
            "MATCH (e:Employee)-[:WORKS_IN]->(d:Department)
             WHERE id(d) = $id
             RETURN e",
        )
        .param("id", department_id.raw());

        tracing::debug!(department_id = %department_id, "Fetching department members");
        let mut txn = self.begin(Access::Read).await?;
        let outcome = txn.rows(q).await.and_then(|rows| summaries(&rows));
        txn.finish(outcome).await
    }
}

// ── In-transaction reads ─────────────────────────────────────────

async fn list_employees_in(txn: &mut GraphTxn) -> Result<Vec<Employee>, GraphError> {
    let rows = txn.rows(query("MATCH (e:Employee) RETURN e")).await?;
    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let node = node_column(&row, "e")?;
        results.push(Employee {
            id: NodeId::from_raw(node.id()),
            name: string_prop(&node, "name"),
            position: string_prop(&node, "position"),
        });
    }
    Ok(results)
}

async fn list_departments_in(txn: &mut GraphTxn) -> Result<Vec<Department>, GraphError> {
    let rows = txn.rows(query("MATCH (d:Department) RETURN d")).await?;
    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let node = node_column(&row, "d")?;
        results.push(Department {
            name: string_prop(&node, "name"),
        });
    }
    Ok(results)
}

/// Whether an Employee node with this id exists.
pub(crate) async fn employee_exists(txn: &mut GraphTxn, id: NodeId) -> Result<bool, GraphError> {
    let q = query(
        "MATCH (e:Employee)
         WHERE id(e) = $id
         RETURN id(e) AS id",
    )
    .param("id", id.raw());

    Ok(!txn.rows(q).await?.is_empty())
}

/// Departments the employee manages (at most one in the intended model).
pub(crate) async fn managed_departments(
    txn: &mut GraphTxn,
    id: NodeId,
) -> Result<Vec<NodeId>, GraphError> {
    let q = query(
        "MATCH (e:Employee)-[:MANAGES]->(d:Department)
         WHERE id(e) = $id
         RETURN id(d) AS department_id",
    )
    .param("id", id.raw());

    let rows = txn.rows(q).await?;
    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        let raw: i64 = row
            .get("department_id")
            .map_err(|e| GraphError::Serialization(format!("Failed to read department id: {e}")))?;
        ids.push(NodeId::from_raw(raw));
    }
    Ok(ids)
}

fn summaries(rows: &[Row]) -> Result<Vec<EmployeeSummary>, GraphError> {
    rows.iter()
        .map(|row| {
            let node = node_column(row, "e")?;
            Ok(EmployeeSummary {
                name: string_prop(&node, "name"),
                position: string_prop(&node, "position"),
            })
        })
        .collect()
}
