use axum::response::{Html, Json};
use serde_json::{json, Value};

pub async fn get_api_docs() -> Html<&'static str> {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Todo API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        html {
            box-sizing: border-box;
            overflow-y: scroll;
        }
        body {
            margin: 0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/docs/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis]
            });
        };
    </script>
</body>
</html>
"#,
    )
}

pub async fn get_openapi_spec() -> Json<Value> {
    Json(openapi_document())
}

fn todo_list_body() -> Value {
    json!({
        "type": "object",
        "properties": {
            "todos": { "type": "array", "items": { "$ref": "#/components/schemas/Todo" } }
        }
    })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn ok(description: &str, schema: Value) -> Value {
    json!({ "description": description, "content": json_content(schema) })
}

fn secured() -> Value {
    json!([{ "clientId": [] }])
}

fn response_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/responses/{}", name) })
}

fn id_parameter(description: &str) -> Value {
    json!({
        "in": "path",
        "name": "id",
        "required": true,
        "schema": { "type": "integer", "format": "int64" },
        "description": description
    })
}

fn ids_body(extra: Value) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "ids": { "type": "array", "items": { "type": "integer", "format": "int64" } }
        },
        "required": ["ids"]
    });
    if let (Some(properties), Some(extra)) = (schema["properties"].as_object_mut(), extra.as_object()) {
        for (name, property) in extra {
            properties.insert(name.clone(), property.clone());
        }
    }
    if let (Some(required), Some(extra)) = (schema["required"].as_array_mut(), extra.as_object()) {
        required.extend(extra.keys().map(|name| json!(name)));
    }
    json!({ "required": true, "content": json_content(schema) })
}

/// OpenAPI 3.0 description of every route
pub fn openapi_document() -> Value {
    let array_of_todos = json!({ "type": "array", "items": { "$ref": "#/components/schemas/Todo" } });
    let todo_ref = json!({ "$ref": "#/components/schemas/Todo" });
    let patch_body = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "minLength": 1 },
            "completed": { "type": "boolean" }
        }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Todo API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Per-client todo lists. Every todo belongs to the client id sent in the X-Client-ID header."
        },
        "servers": [{ "url": "/", "description": "Current server" }],
        "paths": {
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": ok("Service is up", json!({
                            "type": "object",
                            "properties": {
                                "status": { "type": "string" },
                                "timestamp": { "type": "string", "format": "date-time" }
                            }
                        }))
                    }
                }
            },
            "/sign_in": {
                "post": {
                    "summary": "Sign in",
                    "description": "Issues a new client id, or reuses the one supplied in X-Client-ID. The id is also echoed in the X-Client-ID response header.",
                    "parameters": [{
                        "in": "header",
                        "name": "X-Client-ID",
                        "schema": { "type": "string" },
                        "required": false,
                        "description": "Existing client id (optional)"
                    }],
                    "responses": {
                        "200": ok("Client id", json!({
                            "type": "object",
                            "properties": { "clientId": { "type": "string" } }
                        }))
                    }
                }
            },
            "/todos": {
                "get": {
                    "summary": "List todos",
                    "description": "Returns the caller's todos, newest first.",
                    "security": secured(),
                    "responses": {
                        "200": ok("Todos", array_of_todos.clone()),
                        "401": response_ref("Unauthorized")
                    }
                },
                "post": {
                    "summary": "Create a todo",
                    "security": secured(),
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({
                            "type": "object",
                            "properties": { "title": { "type": "string", "minLength": 1 } },
                            "required": ["title"]
                        }))
                    },
                    "responses": {
                        "200": ok("Created todo", todo_ref.clone()),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized")
                    }
                },
                "patch": {
                    "summary": "Update several todos",
                    "description": "Applies each entry in order. Entries that match none of the caller's todos are skipped; only updated todos are returned.",
                    "security": secured(),
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "id": { "type": "integer", "format": "int64" },
                                    "title": { "type": "string", "minLength": 1 },
                                    "completed": { "type": "boolean" }
                                },
                                "required": ["id"]
                            }
                        }))
                    },
                    "responses": {
                        "200": ok("Updated todos", array_of_todos.clone()),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized")
                    }
                },
                "delete": {
                    "summary": "Delete several todos",
                    "security": secured(),
                    "requestBody": ids_body(json!({})),
                    "responses": {
                        "200": ok("Deleted todos", array_of_todos),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized")
                    }
                }
            },
            "/todos/{id}": {
                "patch": {
                    "summary": "Update a todo",
                    "description": "Fields left out keep their current value.",
                    "security": secured(),
                    "parameters": [id_parameter("Id of the todo to update")],
                    "requestBody": { "required": true, "content": json_content(patch_body) },
                    "responses": {
                        "200": ok("Updated todo", todo_ref.clone()),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "404": response_ref("NotFound")
                    }
                },
                "delete": {
                    "summary": "Delete a todo",
                    "security": secured(),
                    "parameters": [id_parameter("Id of the todo to delete")],
                    "responses": {
                        "200": ok("Deleted todo", todo_ref),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "404": response_ref("NotFound")
                    }
                }
            },
            "/todos/bulk-complete": {
                "post": {
                    "summary": "Set the completed state of several todos",
                    "security": secured(),
                    "requestBody": ids_body(json!({ "completed": { "type": "boolean" } })),
                    "responses": {
                        "200": ok("Updated todos", todo_list_body()),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "404": response_ref("NotFound")
                    }
                }
            },
            "/todos/bulk-delete": {
                "post": {
                    "summary": "Delete several todos",
                    "security": secured(),
                    "requestBody": ids_body(json!({})),
                    "responses": {
                        "200": ok("Deleted todos", todo_list_body()),
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "404": response_ref("NotFound")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Todo": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "completed": { "type": "boolean" },
                        "created_at": { "type": "string", "format": "date-time" },
                        "client_id": { "type": "string" }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            },
            "responses": {
                "BadRequest": ok("Malformed or invalid request", json!({ "$ref": "#/components/schemas/ErrorResponse" })),
                "Unauthorized": ok("Missing client id", json!({ "$ref": "#/components/schemas/ErrorResponse" })),
                "NotFound": ok("No matching todo", json!({ "$ref": "#/components/schemas/ErrorResponse" }))
            },
            "securitySchemes": {
                "clientId": { "type": "apiKey", "in": "header", "name": "X-Client-ID" }
            }
        }
    })
}
