//! In-process `StaffStore` with the same semantics as the Neo4j queries.
//!
//! Used as the injected store in tests. The fixture helpers that build a
//! graph without going through validation need the `test-util` feature.
//! One mutex guards the whole graph, so every operation observes and
//! mutates it atomically.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use staffgraph_core::{Department, Employee, EmployeeInput, EmployeeSummary, NodeId, RelType};

use crate::client::GraphError;
use crate::store::StaffStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Employee,
    Department,
}

#[derive(Debug, Clone)]
struct MemNode {
    label: Label,
    name: Option<String>,
    position: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemEdge {
    from: i64,
    rel: RelType,
    to: i64,
}

#[derive(Debug, Default)]
struct MemGraph {
    next_id: i64,
    nodes: BTreeMap<i64, MemNode>,
    edges: Vec<MemEdge>,
}

impl MemGraph {
    fn create(&mut self, label: Label, name: Option<&str>, position: Option<&str>) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            MemNode {
                label,
                name: name.map(str::to_string),
                position: position.map(str::to_string),
            },
        );
        id
    }

    fn has(&self, id: i64, label: Label) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.label == label)
    }

    /// Edges only ever run Employee → Department.
    fn relate(&mut self, from: i64, rel: RelType, to: i64) {
        if self.has(from, Label::Employee) && self.has(to, Label::Department) {
            self.edges.push(MemEdge { from, rel, to });
        }
    }

    fn detach_delete(&mut self, id: i64) {
        self.nodes.remove(&id);
        self.edges.retain(|e| e.from != id && e.to != id);
    }

    fn targets(&self, from: i64, rel: RelType) -> Vec<i64> {
        self.edges
            .iter()
            .filter(|e| e.from == from && e.rel == rel)
            .map(|e| e.to)
            .collect()
    }

    fn sources(&self, rel: RelType, to: i64) -> Vec<i64> {
        self.edges
            .iter()
            .filter(|e| e.to == to && e.rel == rel)
            .map(|e| e.from)
            .collect()
    }

    fn ids_with(&self, label: Label, name: &str) -> Vec<i64> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.label == label && n.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
            .collect()
    }

    fn summary(&self, id: i64) -> Option<EmployeeSummary> {
        self.nodes.get(&id).map(|n| EmployeeSummary {
            name: n.name.clone(),
            position: n.position.clone(),
        })
    }

    fn staff_of(&self, department: i64) -> Vec<EmployeeSummary> {
        self.sources(RelType::WorksIn, department)
            .into_iter()
            .filter_map(|e| self.summary(e))
            .collect()
    }
}

/// Mutex-guarded in-memory employee graph.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: Mutex<MemGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an Employee node directly, bypassing validation.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn add_employee(&self, name: &str, position: &str) -> NodeId {
        let mut graph = self.graph.lock().await;
        NodeId::from_raw(graph.create(Label::Employee, Some(name), Some(position)))
    }

    /// Insert a Department node directly.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn add_department(&self, name: &str) -> NodeId {
        let mut graph = self.graph.lock().await;
        NodeId::from_raw(graph.create(Label::Department, Some(name), None))
    }

    /// Connect an employee to a department. Like `MATCH ... CREATE`, this is a
    /// no-op when either endpoint is missing or has the wrong label.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn relate(&self, employee: NodeId, rel: RelType, department: NodeId) {
        let mut graph = self.graph.lock().await;
        graph.relate(employee.raw(), rel, department.raw());
    }

    /// Whether the given edge exists.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn has_edge(&self, employee: NodeId, rel: RelType, department: NodeId) -> bool {
        let graph = self.graph.lock().await;
        graph.edges.contains(&MemEdge {
            from: employee.raw(),
            rel,
            to: department.raw(),
        })
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn seed(&self) -> Result<(), GraphError> {
        let mut graph = self.graph.lock().await;

        graph.create(Label::Employee, None, None);
        graph.create(Label::Department, None, None);
        for rel in [RelType::WorksIn, RelType::Manages] {
            let e = graph.create(Label::Employee, None, None);
            let d = graph.create(Label::Department, None, None);
            graph.relate(e, rel, d);
        }

        graph.create(Label::Employee, Some("John Doe"), Some("Manager"));
        graph.create(Label::Department, Some("Marketing"), None);
        let employees = graph.ids_with(Label::Employee, "John Doe");
        let departments = graph.ids_with(Label::Department, "Marketing");
        for e in &employees {
            for d in &departments {
                graph.relate(*e, RelType::WorksIn, *d);
            }
        }
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, GraphError> {
        let graph = self.graph.lock().await;
        Ok(graph
            .nodes
            .iter()
            .filter(|(_, n)| n.label == Label::Employee)
            .map(|(id, n)| Employee {
                id: NodeId::from_raw(*id),
                name: n.name.clone(),
                position: n.position.clone(),
            })
            .collect())
    }

    async fn create_employee(&self, input: &EmployeeInput) -> Result<(), GraphError> {
        input.validate()?;
        let mut graph = self.graph.lock().await;
        graph.create(
            Label::Employee,
            Some(input.name.as_str()),
            Some(input.position.as_str()),
        );
        Ok(())
    }

    async fn update_employee(
        &self,
        id: NodeId,
        input: &EmployeeInput,
    ) -> Result<EmployeeInput, GraphError> {
        input.validate()?;
        let mut graph = self.graph.lock().await;
        let node = graph
            .nodes
            .get_mut(&id.raw())
            .filter(|n| n.label == Label::Employee)
            .ok_or(GraphError::NotFound {
                label: "Employee",
                id,
            })?;
        node.name = Some(input.name.clone());
        node.position = Some(input.position.clone());
        Ok(input.clone())
    }

    async fn delete_employee(&self, id: NodeId) -> Result<NodeId, GraphError> {
        let mut graph = self.graph.lock().await;
        if !graph.has(id.raw(), Label::Employee) {
            return Err(GraphError::NotFound {
                label: "Employee",
                id,
            });
        }

        for department in graph.targets(id.raw(), RelType::Manages) {
            graph.detach_delete(department);
        }
        graph.detach_delete(id.raw());
        Ok(id)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, GraphError> {
        let graph = self.graph.lock().await;
        Ok(graph
            .nodes
            .values()
            .filter(|n| n.label == Label::Department)
            .map(|n| Department {
                name: n.name.clone(),
            })
            .collect())
    }

    async fn department_employees_by_manager(
        &self,
        manager_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        let graph = self.graph.lock().await;
        Ok(graph
            .targets(manager_id.raw(), RelType::Manages)
            .into_iter()
            .flat_map(|d| graph.staff_of(d))
            .collect())
    }

    async fn department_members(
        &self,
        department_id: NodeId,
    ) -> Result<Vec<EmployeeSummary>, GraphError> {
        let graph = self.graph.lock().await;
        if !graph.has(department_id.raw(), Label::Department) {
            return Ok(Vec::new());
        }
        Ok(graph.staff_of(department_id.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, position: &str) -> EmployeeSummary {
        EmployeeSummary {
            name: Some(name.to_string()),
            position: Some(position.to_string()),
        }
    }

    /// Marketing managed by Mia, staffed by Sam and Tess.
    async fn marketing(store: &MemoryStore) -> (NodeId, NodeId, NodeId, NodeId) {
        let dept = store.add_department("Marketing").await;
        let mia = store.add_employee("Mia", "Head of Marketing").await;
        let sam = store.add_employee("Sam", "Analyst").await;
        let tess = store.add_employee("Tess", "Designer").await;
        store.relate(mia, RelType::Manages, dept).await;
        store.relate(sam, RelType::WorksIn, dept).await;
        store.relate(tess, RelType::WorksIn, dept).await;
        (dept, mia, sam, tess)
    }

    #[tokio::test]
    async fn create_then_list_shows_employee_once() {
        let store = MemoryStore::new();
        store
            .create_employee(&EmployeeInput::new("Ada", "Engineer"))
            .await
            .unwrap();

        let employees = store.list_employees().await.unwrap();
        let matching: Vec<_> = employees
            .iter()
            .filter(|e| e.name.as_deref() == Some("Ada"))
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].position.as_deref(), Some("Engineer"));
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let store = MemoryStore::new();
        let err = store
            .create_employee(&EmployeeInput::new("", "Engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Invalid(_)));
        assert!(store.list_employees().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_twice_matches_update_once() {
        let store = MemoryStore::new();
        let id = store.add_employee("Ada", "Engineer").await;
        let input = EmployeeInput::new("Ada Lovelace", "Principal Engineer");

        let applied = store.update_employee(id, &input).await.unwrap();
        assert_eq!(applied, input);
        let once = store.list_employees().await.unwrap();

        store.update_employee(id, &input).await.unwrap();
        let twice = store.list_employees().await.unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice[0].name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_changes_nothing() {
        let store = MemoryStore::new();
        store.add_employee("Ada", "Engineer").await;
        let before = store.list_employees().await.unwrap();

        let err = store
            .update_employee(NodeId::from_raw(999), &EmployeeInput::new("X", "Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { label: "Employee", .. }));
        assert_eq!(store.list_employees().await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_does_not_apply_to_departments() {
        let store = MemoryStore::new();
        let dept = store.add_department("Sales").await;
        let err = store
            .update_employee(dept, &EmployeeInput::new("X", "Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_non_manager_keeps_department_and_colleagues() {
        let store = MemoryStore::new();
        let (dept, mia, sam, tess) = marketing(&store).await;

        assert_eq!(store.delete_employee(sam).await.unwrap(), sam);

        let names: Vec<_> = store
            .list_employees()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Mia", "Tess"]);
        assert_eq!(store.list_departments().await.unwrap().len(), 1);
        assert!(store.has_edge(tess, RelType::WorksIn, dept).await);
        assert!(store.has_edge(mia, RelType::Manages, dept).await);
    }

    #[tokio::test]
    async fn delete_manager_cascades_to_managed_department() {
        let store = MemoryStore::new();
        let (dept, mia, sam, tess) = marketing(&store).await;
        store.add_department("Sales").await;

        store.delete_employee(mia).await.unwrap();

        let departments = store.list_departments().await.unwrap();
        assert_eq!(
            departments,
            vec![Department {
                name: Some("Sales".to_string())
            }]
        );
        let employees = store.list_employees().await.unwrap();
        assert_eq!(employees.len(), 2);
        assert!(employees.iter().all(|e| e.id != mia));
        assert!(!store.has_edge(sam, RelType::WorksIn, dept).await);
        assert!(!store.has_edge(tess, RelType::WorksIn, dept).await);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found_and_changes_nothing() {
        let store = MemoryStore::new();
        marketing(&store).await;
        let before = store.list_employees().await.unwrap();

        let err = store
            .delete_employee(NodeId::from_raw(12_345))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
        assert_eq!(store.list_employees().await.unwrap(), before);
        assert_eq!(store.list_departments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_departments_reports_names_only() {
        let store = MemoryStore::new();
        marketing(&store).await;
        store.add_department("Sales").await;

        let names: Vec<_> = store
            .list_departments()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![Some("Marketing".to_string()), Some("Sales".to_string())]
        );
    }

    #[tokio::test]
    async fn department_employees_are_found_through_the_manager() {
        let store = MemoryStore::new();
        let (dept, mia, _, _) = marketing(&store).await;
        let sales = store.add_department("Sales").await;
        let ola = store.add_employee("Ola", "Rep").await;
        store.relate(ola, RelType::WorksIn, sales).await;

        let staff = store.department_employees_by_manager(mia).await.unwrap();
        assert_eq!(
            staff,
            vec![summary("Sam", "Analyst"), summary("Tess", "Designer")]
        );

        // The department's own id is not a manager id.
        assert!(store
            .department_employees_by_manager(dept)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn department_members_by_department_id() {
        let store = MemoryStore::new();
        let (dept, mia, _, _) = marketing(&store).await;

        let members = store.department_members(dept).await.unwrap();
        assert_eq!(
            members,
            vec![summary("Sam", "Analyst"), summary("Tess", "Designer")]
        );
        assert!(store.department_members(mia).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_builds_demo_dataset() {
        let store = MemoryStore::new();
        store.seed().await.unwrap();

        let employees = store.list_employees().await.unwrap();
        let departments = store.list_departments().await.unwrap();
        assert_eq!(employees.len(), 4);
        assert_eq!(departments.len(), 4);

        let john = employees
            .iter()
            .find(|e| e.name.as_deref() == Some("John Doe"))
            .unwrap();
        assert_eq!(john.position.as_deref(), Some("Manager"));
        assert_eq!(employees.iter().filter(|e| e.name.is_none()).count(), 3);

        let marketing_id = NodeId::from_raw(john.id.raw() + 1);
        assert!(store.has_edge(john.id, RelType::WorksIn, marketing_id).await);
    }

    #[tokio::test]
    async fn seed_twice_duplicates() {
        let store = MemoryStore::new();
        store.seed().await.unwrap();
        store.seed().await.unwrap();

        let employees = store.list_employees().await.unwrap();
        assert_eq!(employees.len(), 8);
        let johns = employees
            .iter()
            .filter(|e| e.name.as_deref() == Some("John Doe"))
            .count();
        assert_eq!(johns, 2);
    }
}
