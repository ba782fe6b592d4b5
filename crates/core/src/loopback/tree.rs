//! In-memory UI hierarchy served by the loopback driver.

use serde::Serialize;

/// One node of a screen hierarchy.
///
/// Children are kept in document order; lookups walk the tree pre-order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
	/// Element type, matched by the `tag name` strategy (case-insensitive).
	pub tag: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	pub visible: bool,
	/// Screen pushed when this node is clicked.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub navigates_to: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<UiNode>,
}

impl UiNode {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			id: None,
			name: None,
			value: None,
			class_name: None,
			visible: true,
			navigates_to: None,
			children: Vec::new(),
		}
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
		self.class_name = Some(class_name.into());
		self
	}

	pub fn hidden(mut self) -> Self {
		self.visible = false;
		self
	}

	pub fn navigates_to(mut self, screen: impl Into<String>) -> Self {
		self.navigates_to = Some(screen.into());
		self
	}

	pub fn child(mut self, child: UiNode) -> Self {
		self.children.push(child);
		self
	}

	pub fn children(mut self, children: impl IntoIterator<Item = UiNode>) -> Self {
		self.children.extend(children);
		self
	}

	/// Visible text: the value if set, else the name.
	pub fn text(&self) -> &str {
		self.value
			.as_deref()
			.or(self.name.as_deref())
			.unwrap_or_default()
	}

	/// Attribute lookup with the names mobile servers commonly expose.
	pub fn attribute(&self, name: &str) -> Option<String> {
		match name {
			"name" | "label" | "content-desc" => self.name.clone(),
			"value" | "text" => Some(self.text().to_string()),
			"id" | "resource-id" => self.id.clone(),
			"type" | "tag" => Some(self.tag.clone()),
			"className" | "class" => self.class_name.clone(),
			"visible" | "displayed" => Some(self.visible.to_string()),
			_ => None,
		}
	}

	pub(crate) fn node_at(&self, path: &[usize]) -> Option<&UiNode> {
		path.iter()
			.try_fold(self, |node, &index| node.children.get(index))
	}

	/// Paths (relative to the screen root) of descendants of the node at
	/// `base` matching `predicate`, in pre-order. The base node is excluded.
	pub(crate) fn search<F>(&self, base: &[usize], direct_only: bool, predicate: &F) -> Vec<Vec<usize>>
	where
		F: Fn(&UiNode) -> bool,
	{
		let mut found = Vec::new();
		if let Some(node) = self.node_at(base) {
			let mut path = base.to_vec();
			collect(node, &mut path, direct_only, predicate, &mut found);
		}
		found
	}
}

fn collect<F>(node: &UiNode, path: &mut Vec<usize>, direct_only: bool, predicate: &F, found: &mut Vec<Vec<usize>>)
where
	F: Fn(&UiNode) -> bool,
{
	for (index, child) in node.children.iter().enumerate() {
		path.push(index);
		if predicate(child) {
			found.push(path.clone());
		}
		if !direct_only {
			collect(child, path, direct_only, predicate, found);
		}
		path.pop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tree() -> UiNode {
		UiNode::new("window").children([
			UiNode::new("cell").with_name("A").child(UiNode::new("text").with_name("A1")),
			UiNode::new("text").with_name("B"),
		])
	}

	#[test]
	fn search_is_preorder_and_excludes_base() {
		let tree = tree();
		let texts = tree.search(&[], false, &|n: &UiNode| n.tag == "text");
		assert_eq!(texts, vec![vec![0, 0], vec![1]]);

		let scoped = tree.search(&[0], false, &|n: &UiNode| n.tag == "cell");
		assert!(scoped.is_empty());
	}

	#[test]
	fn direct_children_only() {
		let tree = tree();
		let texts = tree.search(&[], true, &|n: &UiNode| n.tag == "text");
		assert_eq!(texts, vec![vec![1]]);
	}

	#[test]
	fn text_and_attributes() {
		let node = UiNode::new("textfield").with_name("Rounded").with_value("typed").hidden();
		assert_eq!(node.text(), "typed");
		assert_eq!(node.attribute("name").as_deref(), Some("Rounded"));
		assert_eq!(node.attribute("visible").as_deref(), Some("false"));
		assert_eq!(node.attribute("bogus"), None);
		assert_eq!(UiNode::new("button").with_name("Gray").text(), "Gray");
	}

	#[test]
	fn node_at_out_of_range() {
		assert!(tree().node_at(&[5]).is_none());
		assert_eq!(tree().node_at(&[0, 0]).unwrap().name.as_deref(), Some("A1"));
	}
}
