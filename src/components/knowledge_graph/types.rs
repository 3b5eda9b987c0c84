/// Category of a knowledge node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An idea or definition.
	#[default]
	Concept,
	/// A method for getting something done.
	Technique,
	/// External material: a paper, a link, a book.
	Reference,
	/// Map of content: an index note that gathers other notes.
	MapOfContent,
	/// An assertion that can be argued for or against.
	Claim,
	/// Step-by-step instructions.
	Procedure,
}

impl NodeType {
	/// Short lowercase label, as stored by the data layer.
	pub fn label(self) -> &'static str {
		match self {
			NodeType::Concept => "concept",
			NodeType::Technique => "technique",
			NodeType::Reference => "reference",
			NodeType::MapOfContent => "moc",
			NodeType::Claim => "claim",
			NodeType::Procedure => "procedure",
		}
	}

	/// Fill colour used for plain nodes of this type.
	pub fn color(self) -> &'static str {
		match self {
			NodeType::Concept => "#7aa2f7",
			NodeType::Technique => "#9ece6a",
			NodeType::Reference => "#e0af68",
			NodeType::MapOfContent => "#bb9af7",
			NodeType::Claim => "#f7768e",
			NodeType::Procedure => "#2ac3de",
		}
	}
}

/// A knowledge node as delivered by the data layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnowledgeNode {
	pub id: String,
	pub title: String,
	pub node_type: NodeType,
	pub tags: Vec<String>,
	/// Outgoing links; may name nodes that are not part of the dataset.
	pub linked_node_ids: Vec<String>,
}
