/// Generate comprehensive Markdown documentation from OpenAPI spec
pub fn generate_markdown_docs() -> String {
    let mut markdown = String::new();

    // Header
    markdown.push_str("# DeckPilot API Documentation\n\n");
    markdown.push_str("## Overview\n\n");
    markdown.push_str("DeckPilot is an AI-assisted pitch deck platform for founders. This API provides endpoints for user authentication, deck management and generation, deck templates, investor profiles and matching, and view analytics.\n\n");

    // Table of Contents
    markdown.push_str("## Table of Contents\n\n");
    markdown.push_str("- [Authentication](#authentication)\n");
    markdown.push_str("- [User Profile](#user-profile)\n");
    markdown.push_str("- [Deck Management](#deck-management)\n");
    markdown.push_str("- [Templates](#templates)\n");
    markdown.push_str("- [Investors](#investors)\n");
    markdown.push_str("- [Analytics](#analytics)\n");
    markdown.push_str("- [Error Codes](#error-codes)\n");
    markdown.push_str("- [Examples](#examples)\n\n");

    // Authentication Section
    markdown.push_str("## Authentication\n\n");
    markdown.push_str("Most endpoints require JWT authentication. Include your JWT token in the Authorization header:\n\n");
    markdown.push_str("```http\nAuthorization: Bearer <your-jwt-token>\n```\n\n");
    markdown.push_str("### Public endpoints\n\n");
    markdown.push_str("Two endpoints are reachable without a token:\n");
    markdown.push_str("- `GET /api/decks/shared/{token}` (shared deck pages)\n");
    markdown.push_str("- `POST /api/analytics/track` (the view beacon fired from shared pages)\n\n");

    // Base URL
    markdown.push_str("## Base URL\n\n");
    markdown.push_str("```\nhttp://localhost:8080/api\n```\n\n");

    // Authentication endpoints
    markdown.push_str("## Authentication Endpoints\n\n");

    markdown.push_str("### POST /api/auth/register\n\n");
    markdown.push_str("**Description:** Register a new user account\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"email\": \"founder@example.com\",\n  \"password\": \"Secure!Pass123\",\n  \"first_name\": \"Ada\",\n  \"last_name\": \"Lovelace\",\n  \"company_name\": \"Analytical Engines\",\n  \"role\": \"founder\"\n}\n```\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"token\": \"jwt-token\",\n  \"user\": { \"id\": \"uuid\", \"email\": \"founder@example.com\", \"first_name\": \"Ada\" }\n}\n```\n\n");

    markdown.push_str("### POST /api/auth/login\n\n");
    markdown.push_str("**Description:** Authenticate user and get JWT token\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"email\": \"founder@example.com\",\n  \"password\": \"Secure!Pass123\"\n}\n```\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"token\": \"jwt-token\",\n  \"user\": { \"id\": \"uuid\", \"email\": \"founder@example.com\" }\n}\n```\n\n");

    markdown.push_str("### POST /api/auth/logout\n\n");
    markdown.push_str("**Description:** Revoke the current session token\n\n");

    markdown.push_str("### GET /api/auth/me\n\n");
    markdown.push_str("**Description:** Get the account behind the supplied token\n\n");

    // User endpoints
    markdown.push_str("## User Profile\n\n");

    markdown.push_str("### GET /api/users/profile\n\n");
    markdown.push_str("**Description:** Get the current user's profile\n\n");

    markdown.push_str("### PUT /api/users/profile\n\n");
    markdown.push_str("**Description:** Update profile fields; only supplied fields change\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"first_name\": \"Ada\",\n  \"company_name\": \"Analytical Engines Ltd\"\n}\n```\n\n");

    markdown.push_str("### GET /api/users/preferences\n\n");
    markdown.push_str("**Description:** Get theme and notification preferences\n\n");

    markdown.push_str("### PUT /api/users/preferences\n\n");
    markdown.push_str("**Description:** Update preferences; notification flags merge with existing values\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"theme\": \"dark\",\n  \"notifications\": { \"push\": false }\n}\n```\n\n");

    // Deck endpoints
    markdown.push_str("## Deck Management\n\n");

    markdown.push_str("### GET /api/decks\n\n");
    markdown.push_str("**Description:** List the caller's decks, most recently updated first\n\n");

    markdown.push_str("### POST /api/decks\n\n");
    markdown.push_str("**Description:** Create a new deck\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"title\": \"Series A Pitch\",\n  \"description\": \"Our raise deck\",\n  \"tags\": [\"saas\"]\n}\n```\n\n");

    markdown.push_str("### GET /api/decks/{id}\n\n");
    markdown.push_str("**Description:** Get a deck in its editable form\n\n");

    markdown.push_str("### PUT /api/decks/{id}\n\n");
    markdown.push_str("**Description:** Update deck fields; only supplied fields change\n\n");

    markdown.push_str("### DELETE /api/decks/{id}\n\n");
    markdown.push_str("**Description:** Delete a deck\n\n");

    markdown.push_str("### POST /api/decks/{id}/generate\n\n");
    markdown.push_str("**Description:** Generate slide content from startup info using the AI backend\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"startup_info\": { \"name\": \"Acme\", \"industry\": \"SaaS\", \"stage\": \"seed\" },\n  \"target_investors\": []\n}\n```\n\n");

    markdown.push_str("### POST /api/decks/{id}/slides/{index}/analyze\n\n");
    markdown.push_str("**Description:** Score one slide for clarity and persuasiveness; the feedback is stored on the slide\n\n");

    markdown.push_str("### POST /api/decks/{id}/slides/{index}/suggestions\n\n");
    markdown.push_str("**Description:** Get improvement suggestions for one slide, optionally tuned to an investor profile\n\n");

    markdown.push_str("### POST /api/decks/{id}/customize\n\n");
    markdown.push_str("**Description:** Produce investor-specific copy for every slide, stored per investor type\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"investor_profile\": { \"investor_type\": \"vc\", \"focus\": [\"SaaS\"], \"stage\": [\"seed\"] }\n}\n```\n\n");

    markdown.push_str("### POST /api/decks/{id}/share\n\n");
    markdown.push_str("**Description:** Make the deck public and mint a share link\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"share_token\": \"hex-token\",\n  \"share_url\": \"http://localhost:3000/deck/hex-token\"\n}\n```\n\n");

    markdown.push_str("### GET /api/decks/shared/{token}\n\n");
    markdown.push_str("**Description:** Open a shared deck (public, counts a view)\n\n");

    markdown.push_str("### POST /api/decks/{id}/duplicate\n\n");
    markdown.push_str("**Description:** Copy a deck; the copy starts as a draft with fresh stats\n\n");

    // Template endpoints
    markdown.push_str("## Templates\n\n");

    markdown.push_str("### GET /api/templates\n\n");
    markdown.push_str("**Description:** List the built-in deck templates\n\n");

    markdown.push_str("### GET /api/templates/{id}\n\n");
    markdown.push_str("**Description:** Get one template by id (`default`, `saas`, `fintech`)\n\n");

    // Investor endpoints
    markdown.push_str("## Investors\n\n");

    markdown.push_str("### GET /api/investors\n\n");
    markdown.push_str("**Description:** List the caller's saved investor profiles\n\n");

    markdown.push_str("### POST /api/investors\n\n");
    markdown.push_str("**Description:** Save a new investor profile\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"name\": \"Jordan Blake\",\n  \"investor_type\": \"vc\",\n  \"firm\": \"Blake Ventures\",\n  \"investment_criteria\": { \"preferred_stages\": [\"seed\"], \"preferred_sectors\": [\"SaaS\"] }\n}\n```\n\n");

    markdown.push_str("### GET /api/investors/templates\n\n");
    markdown.push_str("**Description:** Built-in investor personas (seed VC, angel, accelerator, corporate VC)\n\n");

    markdown.push_str("### POST /api/investors/match\n\n");
    markdown.push_str("**Description:** Find active investors matching the given criteria, scored and sorted\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"stage\": \"seed\",\n  \"sector\": \"SaaS\",\n  \"funding_amount\": 1000000\n}\n```\n\n");

    markdown.push_str("### GET /api/investors/{id}\n\n");
    markdown.push_str("**Description:** Get one investor profile\n\n");

    markdown.push_str("### PUT /api/investors/{id}\n\n");
    markdown.push_str("**Description:** Update investor fields; only supplied fields change\n\n");

    markdown.push_str("### DELETE /api/investors/{id}\n\n");
    markdown.push_str("**Description:** Delete an investor profile\n\n");

    markdown.push_str("### GET /api/investors/{id}/insights\n\n");
    markdown.push_str("**Description:** Pitch-preparation briefing derived from the profile\n\n");

    markdown.push_str("### POST /api/investors/{id}/customize-deck\n\n");
    markdown.push_str("**Description:** Tailor a deck's content to this investor\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"deck_id\": \"uuid\",\n  \"customization_type\": \"full\"\n}\n```\n\n");

    // Analytics endpoints
    markdown.push_str("## Analytics\n\n");

    markdown.push_str("### POST /api/analytics/track\n\n");
    markdown.push_str("**Description:** Record a view event (public, fired from shared deck pages)\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"deck_id\": \"uuid\",\n  \"session_id\": \"session-1\",\n  \"viewer_type\": \"investor\",\n  \"duration\": 120,\n  \"slide_views\": [ { \"slide_index\": 0, \"time_spent\": 30, \"interactions\": [] } ]\n}\n```\n\n");
    markdown.push_str("**Response:**\n```json\n{\n  \"success\": true\n}\n```\n\n");

    markdown.push_str("### GET /api/analytics/deck/{id}\n\n");
    markdown.push_str("**Description:** Full analytics for one deck: totals, per-slide engagement, demographics, and investor interactions. Average view time is reported in minutes.\n\n");

    markdown.push_str("### GET /api/analytics/overview\n\n");
    markdown.push_str("**Description:** Account-wide rollup: totals, top five decks by views, ten most recent activities\n\n");

    markdown.push_str("### POST /api/analytics/investor-interaction\n\n");
    markdown.push_str("**Description:** Record an investor touchpoint on a deck; repeat events for the same investor merge into one record\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"deck_id\": \"uuid\",\n  \"investor_id\": \"crm-42\",\n  \"interaction_type\": \"deck_viewed\",\n  \"investor_name\": \"Jordan Blake\",\n  \"investor_type\": \"vc\",\n  \"interest_level\": \"high\"\n}\n```\n\n");

    markdown.push_str("### PUT /api/analytics/investor-interaction/{id}\n\n");
    markdown.push_str("**Description:** Update the pipeline status of an interaction record\n\n");

    markdown.push_str("### GET /api/analytics/deck/{id}/slides\n\n");
    markdown.push_str("**Description:** Per-slide engagement table, one row per slide even when nobody reached it\n\n");

    // Error codes
    markdown.push_str("## Error Codes\n\n");
    markdown.push_str("| Code | Description |\n");
    markdown.push_str("|------|-------------|\n");
    markdown.push_str("| 200 | Success |\n");
    markdown.push_str("| 201 | Created |\n");
    markdown.push_str("| 400 | Bad Request - Invalid input data |\n");
    markdown.push_str("| 401 | Unauthorized - Invalid or missing JWT token |\n");
    markdown.push_str("| 403 | Forbidden - Insufficient permissions |\n");
    markdown.push_str("| 404 | Not Found - Resource not found |\n");
    markdown.push_str("| 429 | Too Many Requests - Rate limit exceeded |\n");
    markdown.push_str("| 500 | Internal Server Error |\n\n");

    // Examples
    markdown.push_str("## Examples\n\n");
    markdown.push_str("### Register a new user\n\n");
    markdown.push_str("```bash\ncurl -X POST http://localhost:8080/api/auth/register \\\n");
    markdown.push_str("  -H \"Content-Type: application/json\" \\\n");
    markdown.push_str("  -d '{\n");
    markdown.push_str("    \"email\": \"founder@example.com\",\n");
    markdown.push_str("    \"password\": \"Secure!Pass123\",\n");
    markdown.push_str("    \"first_name\": \"Ada\",\n");
    markdown.push_str("    \"last_name\": \"Lovelace\"\n");
    markdown.push_str("  }'\n```\n\n");

    markdown.push_str("### Create a deck\n\n");
    markdown.push_str("```bash\ncurl -X POST http://localhost:8080/api/decks \\\n");
    markdown.push_str("  -H \"Authorization: Bearer <your-jwt-token>\" \\\n");
    markdown.push_str("  -H \"Content-Type: application/json\" \\\n");
    markdown.push_str("  -d '{\n");
    markdown.push_str("    \"title\": \"Series A Pitch\"\n");
    markdown.push_str("  }'\n```\n\n");

    markdown.push_str("### Track a view from a shared page\n\n");
    markdown.push_str("```bash\ncurl -X POST http://localhost:8080/api/analytics/track \\\n");
    markdown.push_str("  -H \"Content-Type: application/json\" \\\n");
    markdown.push_str("  -d '{\n");
    markdown.push_str("    \"deck_id\": \"<deck-id>\",\n");
    markdown.push_str("    \"session_id\": \"session-1\",\n");
    markdown.push_str("    \"duration\": 95\n");
    markdown.push_str("  }'\n```\n\n");

    markdown.push_str("## Support\n\n");
    markdown.push_str("For technical support or questions about the API, please contact the development team.\n\n");
    markdown.push_str("---\n\n");
    markdown.push_str("*This documentation is auto-generated from the OpenAPI specification and will stay in sync with the codebase.*\n");

    markdown
}

/// Generate comprehensive HTML documentation page
pub fn generate_documentation_html() -> String {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>DeckPilot API Documentation</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            line-height: 1.6;
            color: #333;
            background-color: #f8f9fa;
        }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
        }

        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 40px 0;
            text-align: center;
            margin-bottom: 30px;
            border-radius: 10px;
        }

        .header h1 {
            font-size: 2.5rem;
            margin-bottom: 10px;
        }

        .header p {
            font-size: 1.2rem;
            opacity: 0.9;
        }

        .nav {
            background: white;
            padding: 20px;
            border-radius: 10px;
            margin-bottom: 30px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }

        .nav h2 {
            margin-bottom: 15px;
            color: #333;
        }

        .nav-links {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(250px, 1fr));
            gap: 15px;
        }

        .nav-link {
            display: block;
            padding: 15px;
            background: #f8f9fa;
            border: 2px solid #e9ecef;
            border-radius: 8px;
            text-decoration: none;
            color: #495057;
            transition: all 0.3s ease;
        }

        .nav-link:hover {
            border-color: #667eea;
            background: #f0f2ff;
            transform: translateY(-2px);
        }

        .nav-link h3 {
            margin-bottom: 5px;
            color: #333;
        }

        .nav-link p {
            font-size: 0.9rem;
            color: #6c757d;
        }

        .section {
            background: white;
            padding: 30px;
            border-radius: 10px;
            margin-bottom: 30px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }

        .section h2 {
            color: #333;
            margin-bottom: 20px;
            padding-bottom: 10px;
            border-bottom: 2px solid #e9ecef;
        }

        .endpoint {
            margin-bottom: 25px;
            padding: 20px;
            background: #f8f9fa;
            border-radius: 8px;
            border-left: 4px solid #667eea;
        }

        .endpoint h3 {
            color: #333;
            margin-bottom: 10px;
        }

        .method {
            display: inline-block;
            padding: 4px 8px;
            border-radius: 4px;
            font-size: 0.8rem;
            font-weight: bold;
            margin-right: 10px;
        }

        .method.get { background: #28a745; color: white; }
        .method.post { background: #007bff; color: white; }
        .method.put { background: #ffc107; color: black; }
        .method.delete { background: #dc3545; color: white; }

        .endpoint-url {
            font-family: 'Courier New', monospace;
            background: #e9ecef;
            padding: 5px 10px;
            border-radius: 4px;
            font-size: 0.9rem;
        }

        .description {
            margin: 15px 0;
            color: #6c757d;
        }

        .auth-note {
            background: #fff3cd;
            border: 1px solid #ffeaa7;
            border-radius: 4px;
            padding: 10px;
            margin: 10px 0;
            color: #856404;
        }

        .footer {
            text-align: center;
            padding: 20px;
            color: #6c757d;
            border-top: 1px solid #e9ecef;
            margin-top: 30px;
        }

        @media (max-width: 768px) {
            .container {
                padding: 10px;
            }

            .header h1 {
                font-size: 2rem;
            }

            .nav-links {
                grid-template-columns: 1fr;
            }
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🚀 DeckPilot API Documentation</h1>
            <p>AI-assisted pitch decks with investor matching and view analytics</p>
        </div>

        <div class="nav">
            <h2>📚 Quick Access</h2>
            <div class="nav-links">
                <a href="/api/docs" class="nav-link">
                    <h3>🔍 Swagger UI</h3>
                    <p>Interactive API documentation with testing capabilities</p>
                </a>
                <a href="/api/redoc" class="nav-link">
                    <h3>📖 Redoc UI</h3>
                    <p>Clean, responsive API documentation</p>
                </a>
                <a href="/docs/openapi.json" class="nav-link">
                    <h3>📄 OpenAPI JSON</h3>
                    <p>Download the complete OpenAPI specification</p>
                </a>
                <a href="/docs/markdown" class="nav-link">
                    <h3>📝 Markdown</h3>
                    <p>Download documentation as Markdown file</p>
                </a>
            </div>
        </div>

        <div class="section">
            <h2>🔐 Authentication</h2>
            <p>Most endpoints require JWT authentication. Include your JWT token in the Authorization header:</p>
            <div class="endpoint">
                <code>Authorization: Bearer &lt;your-jwt-token&gt;</code>
            </div>

            <div class="auth-note">
                <strong>🌐 Public endpoints:</strong> shared deck pages (GET /api/decks/shared/{token}) and the view beacon (POST /api/analytics/track) work without a token.
            </div>
        </div>

        <div class="section">
            <h2>🔑 Authentication Endpoints</h2>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/auth/register</h3>
                <div class="endpoint-url">Register a new user account</div>
                <div class="description">Creates a new founder account with email, password, and name, and returns a session token.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/auth/login</h3>
                <div class="endpoint-url">Authenticate user and get JWT token</div>
                <div class="description">Authenticates user credentials and returns a JWT token alongside the profile.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/auth/logout</h3>
                <div class="endpoint-url">Revoke the current session</div>
                <div class="description">Invalidates the presented token server-side.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/auth/me</h3>
                <div class="endpoint-url">Get the current account</div>
                <div class="description">Returns the profile behind the supplied token.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="section">
            <h2>👤 User Profile</h2>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/users/profile</h3>
                <div class="endpoint-url">Get user profile</div>
                <div class="description">Returns the current user's profile information.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/users/profile</h3>
                <div class="endpoint-url">Update user profile</div>
                <div class="description">Updates name, company, and role. Only supplied fields change.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/users/preferences</h3>
                <div class="endpoint-url">Get preferences</div>
                <div class="description">Returns theme and notification preferences.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/users/preferences</h3>
                <div class="endpoint-url">Update preferences</div>
                <div class="description">Updates theme and notification flags; unspecified flags keep their values.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="section">
            <h2>🎴 Deck Management</h2>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/decks</h3>
                <div class="endpoint-url">List decks</div>
                <div class="description">Returns the caller's decks as summaries, most recently updated first.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks</h3>
                <div class="endpoint-url">Create a deck</div>
                <div class="description">Creates a draft deck with a title and optional startup info, tags, and target investors.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/decks/{id}</h3>
                <div class="endpoint-url">Get a deck for editing</div>
                <div class="description">Returns slides, theme, startup info, and AI metadata for the editor.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/decks/{id}</h3>
                <div class="endpoint-url">Update a deck</div>
                <div class="description">Updates deck fields; only supplied fields change.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method delete">DELETE</span> /api/decks/{id}</h3>
                <div class="endpoint-url">Delete a deck</div>
                <div class="description">Removes the deck and its share link.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/generate</h3>
                <div class="endpoint-url">Generate slide content</div>
                <div class="description">Builds a complete slide set from startup info using the AI backend.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/slides/{index}/analyze</h3>
                <div class="endpoint-url">Analyze one slide</div>
                <div class="description">Scores the slide for clarity and persuasiveness and stores the feedback on it.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/slides/{index}/suggestions</h3>
                <div class="endpoint-url">Get slide suggestions</div>
                <div class="description">Returns improvement suggestions, optionally tuned to an investor profile.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/customize</h3>
                <div class="endpoint-url">Customize for an investor</div>
                <div class="description">Produces investor-specific copy for every slide, stored per investor type.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/share</h3>
                <div class="endpoint-url">Share a deck</div>
                <div class="description">Marks the deck public and returns a tokenized share URL.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/decks/shared/{token}</h3>
                <div class="endpoint-url">Open a shared deck</div>
                <div class="description">Public viewer payload for a shared deck. Each open counts a view.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/decks/{id}/duplicate</h3>
                <div class="endpoint-url">Duplicate a deck</div>
                <div class="description">Copies the deck. The copy starts as an unshared draft with fresh stats.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="section">
            <h2>📐 Templates</h2>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/templates</h3>
                <div class="endpoint-url">List deck templates</div>
                <div class="description">Returns the built-in template catalog.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/templates/{id}</h3>
                <div class="endpoint-url">Get one template</div>
                <div class="description">Returns a template by id: default, saas, or fintech.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="section">
            <h2>💼 Investors</h2>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/investors</h3>
                <div class="endpoint-url">List investor profiles</div>
                <div class="description">Returns the caller's saved investor profiles.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/investors</h3>
                <div class="endpoint-url">Create an investor profile</div>
                <div class="description">Saves an investor with criteria, communication preferences, and contact details.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/investors/templates</h3>
                <div class="endpoint-url">Investor personas</div>
                <div class="description">Built-in personas: seed VC, angel, accelerator, and corporate VC.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/investors/match</h3>
                <div class="endpoint-url">Match investors</div>
                <div class="description">Finds active investors matching stage, sector, geography, amount, and type, scored and sorted.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/investors/{id}</h3>
                <div class="endpoint-url">Get an investor</div>
                <div class="description">Returns one investor profile.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/investors/{id}</h3>
                <div class="endpoint-url">Update an investor</div>
                <div class="description">Updates profile fields; only supplied fields change.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method delete">DELETE</span> /api/investors/{id}</h3>
                <div class="endpoint-url">Delete an investor</div>
                <div class="description">Removes the profile.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/investors/{id}/insights</h3>
                <div class="endpoint-url">Investor insights</div>
                <div class="description">Pitch-preparation briefing: focus areas, deal breakers, questions, and recommendations.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/investors/{id}/customize-deck</h3>
                <div class="endpoint-url">Customize a deck for this investor</div>
                <div class="description">Runs the AI customization against one of the caller's decks.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="section">
            <h2>📊 Analytics</h2>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/analytics/track</h3>
                <div class="endpoint-url">Track a view</div>
                <div class="description">Records a view event from a shared deck page. Anonymous by design.</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/analytics/deck/{id}</h3>
                <div class="endpoint-url">Deck analytics</div>
                <div class="description">Totals, per-slide engagement, demographics, and investor interactions for one deck.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/analytics/overview</h3>
                <div class="endpoint-url">Account overview</div>
                <div class="description">Cross-deck totals, the top five decks by views, and recent activity.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method post">POST</span> /api/analytics/investor-interaction</h3>
                <div class="endpoint-url">Record an investor interaction</div>
                <div class="description">Logs an investor touchpoint; repeat events for the same investor merge into one record.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method put">PUT</span> /api/analytics/investor-interaction/{id}</h3>
                <div class="endpoint-url">Update an interaction</div>
                <div class="description">Moves the interaction through the pipeline: pending, responded, meeting scheduled, passed, invested.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>

            <div class="endpoint">
                <h3><span class="method get">GET</span> /api/analytics/deck/{id}/slides</h3>
                <div class="endpoint-url">Per-slide analytics</div>
                <div class="description">Engagement table with one row per slide, including slides nobody reached.</div>
                <div class="auth-note">🔒 Requires JWT</div>
            </div>
        </div>

        <div class="footer">
            <p>📚 This documentation is auto-generated from the OpenAPI specification and stays in sync with the codebase.</p>
            <p>🔄 Last updated: <span id="last-updated"></span></p>
        </div>
    </div>

    <script>
        // Set last updated timestamp
        document.getElementById('last-updated').textContent = new Date().toLocaleString();
    </script>
</body>
</html>
    "#;

    html.to_string()
}
