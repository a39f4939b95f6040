//! Agent definition: a model, its instructions, its tools and its hooks.

use crate::hooks::LifecycleHooks;
use crate::tools::{LlmTool, ToolDescriptor};
use std::sync::Arc;

/// An LLM agent the runner can drive
pub struct Agent {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: Option<String>,
    tools: Vec<Arc<dyn LlmTool>>,
    hooks: Vec<Arc<dyn LifecycleHooks>>,
}

impl Agent {
    /// Create an agent builder.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use hooklog::runner::Agent;
    /// use hooklog::tools::CurrentTimeTool;
    ///
    /// let agent = Agent::builder("logger_agent", "gemini-2.5-flash")
    ///     .description("An agent that demonstrates lifecycle logging")
    ///     .instruction("Answer questions, using tools when needed.")
    ///     .tool(Arc::new(CurrentTimeTool::new()))
    ///     .hooks(logger.clone())
    ///     .build();
    /// ```
    pub fn builder(name: impl Into<String>, model: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name.into(), model.into())
    }

    pub fn tools(&self) -> &[Arc<dyn LlmTool>] {
        &self.tools
    }

    /// Hooks in registration order
    pub fn hooks(&self) -> &[Arc<dyn LifecycleHooks>] {
        &self.hooks
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn LlmTool>> {
        self.tools.iter().find(|t| t.matches(name))
    }

    pub fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }
}

/// Builder for constructing an `Agent`
pub struct AgentBuilder {
    name: String,
    model: String,
    description: String,
    instruction: Option<String>,
    tools: Vec<Arc<dyn LlmTool>>,
    hooks: Vec<Arc<dyn LifecycleHooks>>,
}

impl AgentBuilder {
    fn new(name: String, model: String) -> Self {
        Self {
            name,
            model,
            description: String::new(),
            instruction: None,
            tools: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the system instruction sent with every model request
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Add one tool
    pub fn tool(mut self, tool: Arc<dyn LlmTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the tools available to the model, replacing any added so far
    pub fn tools(mut self, tools: Vec<Arc<dyn LlmTool>>) -> Self {
        self.tools = tools;
        self
    }

    /// Register lifecycle hooks. Hooks fire in the order they were registered.
    pub fn hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn build(self) -> Agent {
        Agent {
            name: self.name,
            model: self.model,
            description: self.description,
            instruction: self.instruction,
            tools: self.tools,
            hooks: self.hooks,
        }
    }
}
