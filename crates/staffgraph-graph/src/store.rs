//! The query-layer contract consumed by the transport layer.

use async_trait::async_trait;

use staffgraph_core::{Department, Employee, EmployeeInput, EmployeeSummary, NodeId};

use crate::client::{GraphClient, GraphError};

/// One method per query-layer operation. Each call is one transaction.
#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn seed(&self) -> Result<(), GraphError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, GraphError>;

    async fn create_employee(&self, input: &EmployeeInput) -> Result<(), GraphError>;

    async fn update_employee(
        &self,
        id: NodeId,
        input: &EmployeeInput,
    ) -> Result<EmployeeInput, GraphError>;

    async fn delete_employee(&self, id: NodeId) -> Result<NodeId, GraphError>;

    async fn list_departments(&self) -> Result<Vec<Department>, GraphError>;

    /// Staff of the department managed by `manager_id`.
    async fn department_employees_by_manager(
        &self,
        manager_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError>;

    /// Staff whose WORKS_IN edge targets `department_id`.
    async fn department_members(
        &self,
        department_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError>;
}

#[async_trait]
impl StaffStore for GraphClient {
    async fn seed(&self) -> Result<(), GraphError> {
        GraphClient::seed(self).await
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, GraphError> {
        GraphClient::list_employees(self).await
    }

    async fn create_employee(&self, input: &EmployeeInput) -> Result<(), GraphError> {
        GraphClient::create_employee(self, input).await
    }

    async fn update_employee(
        &self,
        id: NodeId,
        input: &EmployeeInput,
    ) -> Result<EmployeeInput, GraphError> {
        GraphClient::update_employee(self, id, input).await
    }

    async fn delete_employee(&self, id: NodeId) -> Result<NodeId, GraphError> {
        GraphClient::delete_employee(self, id).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>, GraphError> {
        GraphClient::list_departments(self).await
    }

    async fn department_employees_by_manager(
        &self,
        manager_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        GraphClient::department_employees_by_manager(self, manager_id).await
    }

    async fn department_members(
        &self,
        department_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        GraphClient::department_members(self, department_id).await
    }
}
